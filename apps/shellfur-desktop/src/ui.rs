use shellfur_kernel::Scene;

/// Tuning panel shown while the pointer is released.
pub fn draw_tuning_panel(ctx: &egui::Context, scene: &mut Scene, fps: Option<u32>) {
    egui::Window::new("Shell Tuning")
        .default_pos([10.0, 10.0])
        .resizable(false)
        .show(ctx, |ui| {
            let modes = scene.modes();
            ui.label(format!(
                "FPS: {}",
                fps.map_or_else(|| "-".to_string(), |f| f.to_string())
            ));
            ui.label(format!(
                "Camera: {}  Flashlight: {}",
                if modes.use_debug_camera { "debug" } else { "player" },
                if modes.flashlight { "on" } else { "off" }
            ));
            ui.separator();

            ui.heading("Fur");
            let layers = scene.shell().layers;
            ui.label(format!("Layers: {layers}"));
            let shell = scene.shell_mut();
            ui.add(egui::Slider::new(&mut shell.fur_length, 0.0..=1.0).text("Length"));
            ui.add(egui::Slider::new(&mut shell.strand_thickness, 0.05..=4.0).text("Thickness"));
            ui.add(
                egui::Slider::new(&mut shell.grid_frequency, 10.0..=4000.0)
                    .logarithmic(true)
                    .text("Density"),
            );
            ui.horizontal(|ui| {
                ui.label("Base color");
                let mut rgb = shell.base_color.to_array();
                if ui.color_edit_button_rgb(&mut rgb).changed() {
                    shell.base_color = glam::Vec3::from_array(rgb);
                }
            });
            ui.horizontal(|ui| {
                ui.label("Gravity");
                ui.add(egui::DragValue::new(&mut shell.gravity.x).speed(0.05).prefix("x: "));
                ui.add(egui::DragValue::new(&mut shell.gravity.y).speed(0.05).prefix("y: "));
                ui.add(egui::DragValue::new(&mut shell.gravity.z).speed(0.05).prefix("z: "));
            });
            ui.separator();

            ui.heading("Wind");
            let wind = scene.wind_mut();
            let mut smoothing = wind.smoothing();
            if ui
                .add(egui::Slider::new(&mut smoothing, 0.0..=0.99).text("Smoothing"))
                .changed()
            {
                wind.set_smoothing(smoothing);
            }
            let mut max_strength = wind.max_strength();
            if ui
                .add(egui::Slider::new(&mut max_strength, 0.0..=10.0).text("Max strength"))
                .changed()
            {
                wind.set_max_strength(max_strength);
            }
            let w = scene.wind_total();
            ui.label(format!("Current: ({:.2}, {:.2}, {:.2})", w.x, w.y, w.z));
        });
}
