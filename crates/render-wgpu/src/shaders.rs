/// WGSL shader for the instanced shell layers.
///
/// Instance `i` of the draw is shell layer `i`; its normalized height
/// `h = i / num_layers` drives extrusion, wind bend, strand cut-off,
/// occlusion and fade.
pub const SHELL_SHADER: &str = r#"
struct Globals {
    model: mat4x4<f32>,
    view: mat4x4<f32>,
    projection: mat4x4<f32>,
    view_position: vec3<f32>,
    time: f32,
};

struct DirLight {
    direction: vec3<f32>,
    ambient: vec3<f32>,
    diffuse: vec3<f32>,
    specular: vec3<f32>,
};

struct PointLight {
    position: vec3<f32>,
    constant: f32,
    ambient: vec3<f32>,
    linear: f32,
    diffuse: vec3<f32>,
    quadratic: f32,
    specular: vec3<f32>,
};

struct SpotLight {
    position: vec3<f32>,
    constant: f32,
    direction: vec3<f32>,
    linear: f32,
    ambient: vec3<f32>,
    quadratic: f32,
    diffuse: vec3<f32>,
    cut_off: f32,
    specular: vec3<f32>,
    outer_cut_off: f32,
    enabled: u32,
};

struct Shell {
    base_color: vec3<f32>,
    num_layers: u32,
    wind_direction: vec3<f32>,
    fur_length: f32,
    gravity: vec3<f32>,
    strand_thickness: f32,
    grid_frequency: f32,
};

struct Frame {
    globals: Globals,
    dir_light: DirLight,
    point_lights: array<PointLight, 4>,
    spot_light: SpotLight,
    shell: Shell,
};

@group(0) @binding(0)
var<uniform> frame: Frame;
@group(0) @binding(1)
var base_texture: texture_2d<f32>;
@group(0) @binding(2)
var base_sampler: sampler;

const SHININESS: f32 = 32.0;
const FUR_SPECULAR: f32 = 0.1;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) world_position: vec3<f32>,
    @location(1) world_normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
    @location(3) height: f32,
};

@vertex
fn vs_shell(vertex: VertexInput, @builtin(instance_index) layer: u32) -> VertexOutput {
    let shell = frame.shell;
    let h = f32(layer) / f32(max(shell.num_layers, 1u));
    let n = normalize(vertex.normal);

    var p = vertex.position + n * shell.fur_length * h;
    p += (shell.wind_direction + shell.gravity) * shell.fur_length * h * h;

    let model = frame.globals.model;
    let world = model * vec4<f32>(p, 1.0);
    let normal_matrix = mat3x3<f32>(model[0].xyz, model[1].xyz, model[2].xyz);

    var out: VertexOutput;
    out.clip_position = frame.globals.projection * frame.globals.view * world;
    out.world_position = world.xyz;
    out.world_normal = normalize(normal_matrix * n);
    out.uv = vertex.uv;
    out.height = h;
    return out;
}

// Integer hash of a grid cell, mapped to [0, 1].
fn hash_cell(cell: vec2<u32>) -> f32 {
    var v = cell.x * 1664525u + cell.y * 1013904223u;
    v = v ^ (v >> 16u);
    v = v * 2246822519u;
    v = v ^ (v >> 13u);
    v = v * 3266489917u;
    v = v ^ (v >> 16u);
    return f32(v) / 4294967295.0;
}

fn attenuation(constant: f32, linear: f32, quadratic: f32, distance: f32) -> f32 {
    return 1.0 / (constant + linear * distance + quadratic * distance * distance);
}

fn phong(light_dir: vec3<f32>, normal: vec3<f32>, view_dir: vec3<f32>) -> vec2<f32> {
    let diff = max(dot(normal, light_dir), 0.0);
    let reflect_dir = reflect(-light_dir, normal);
    let spec = pow(max(dot(view_dir, reflect_dir), 0.0), SHININESS);
    return vec2<f32>(diff, spec * FUR_SPECULAR);
}

fn shade_dir(light: DirLight, normal: vec3<f32>, view_dir: vec3<f32>, albedo: vec3<f32>) -> vec3<f32> {
    let terms = phong(normalize(-light.direction), normal, view_dir);
    return light.ambient * albedo + light.diffuse * terms.x * albedo + light.specular * terms.y;
}

fn shade_point(light: PointLight, normal: vec3<f32>, position: vec3<f32>, view_dir: vec3<f32>, albedo: vec3<f32>) -> vec3<f32> {
    let to_light = light.position - position;
    let terms = phong(normalize(to_light), normal, view_dir);
    let att = attenuation(light.constant, light.linear, light.quadratic, length(to_light));
    return (light.ambient * albedo + light.diffuse * terms.x * albedo + light.specular * terms.y) * att;
}

fn shade_spot(light: SpotLight, normal: vec3<f32>, position: vec3<f32>, view_dir: vec3<f32>, albedo: vec3<f32>) -> vec3<f32> {
    let to_light = light.position - position;
    let light_dir = normalize(to_light);
    let terms = phong(light_dir, normal, view_dir);
    let att = attenuation(light.constant, light.linear, light.quadratic, length(to_light));
    let theta = dot(light_dir, normalize(-light.direction));
    let epsilon = light.cut_off - light.outer_cut_off;
    let intensity = clamp((theta - light.outer_cut_off) / epsilon, 0.0, 1.0);
    return (light.ambient * albedo + (light.diffuse * terms.x * albedo + light.specular * terms.y) * intensity) * att;
}

@fragment
fn fs_shell(in: VertexOutput) -> @location(0) vec4<f32> {
    let shell = frame.shell;
    let albedo = textureSample(base_texture, base_sampler, in.uv).rgb * shell.base_color;

    let scaled = in.uv * shell.grid_frequency;
    let cell = vec2<u32>(max(floor(scaled), vec2<f32>(0.0)));
    let local = fract(scaled) * 2.0 - 1.0;
    let strand_height = hash_cell(cell);
    let h = in.height;

    // Layer 0 is the solid skin; above it only strand cores survive.
    if h > 0.0 {
        let radius = shell.strand_thickness * (strand_height - h);
        if strand_height < h || length(local) > radius {
            discard;
        }
    }

    let normal = normalize(in.world_normal);
    let view_dir = normalize(frame.globals.view_position - in.world_position);

    var color = shade_dir(frame.dir_light, normal, view_dir, albedo);
    for (var i = 0u; i < 4u; i++) {
        color += shade_point(frame.point_lights[i], normal, in.world_position, view_dir, albedo);
    }
    if frame.spot_light.enabled != 0u {
        color += shade_spot(frame.spot_light, normal, in.world_position, view_dir, albedo);
    }

    let occlusion = mix(0.25, 1.0, h);
    let alpha = 1.0 - 0.8 * h * h * h;
    return vec4<f32>(color * occlusion, alpha);
}
"#;

/// WGSL shader for the light marker cubes. Reads only the leading
/// `Globals` block of the shared frame uniform.
pub const MARKER_SHADER: &str = r#"
struct Globals {
    model: mat4x4<f32>,
    view: mat4x4<f32>,
    projection: mat4x4<f32>,
    view_position: vec3<f32>,
    time: f32,
};

@group(0) @binding(0)
var<uniform> globals: Globals;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
};

struct InstanceInput {
    @location(3) position_scale: vec4<f32>,
    @location(4) color: vec4<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) color: vec4<f32>,
};

@vertex
fn vs_marker(vertex: VertexInput, instance: InstanceInput) -> VertexOutput {
    let world = vertex.position * instance.position_scale.w + instance.position_scale.xyz;
    var out: VertexOutput;
    out.clip_position = globals.projection * globals.view * vec4<f32>(world, 1.0);
    out.color = instance.color;
    return out;
}

@fragment
fn fs_marker(in: VertexOutput) -> @location(0) vec4<f32> {
    return in.color;
}
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shell_shader_exposes_frame_contract() {
        for field in [
            "view_position",
            "num_layers",
            "wind_direction",
            "fur_length",
            "gravity",
            "strand_thickness",
            "grid_frequency",
            "point_lights: array<PointLight, 4>",
            "outer_cut_off",
        ] {
            assert!(SHELL_SHADER.contains(field), "missing {field}");
        }
    }

    #[test]
    fn entry_points_present() {
        assert!(SHELL_SHADER.contains("fn vs_shell"));
        assert!(SHELL_SHADER.contains("fn fs_shell"));
        assert!(MARKER_SHADER.contains("fn vs_marker"));
        assert!(MARKER_SHADER.contains("fn fs_marker"));
    }
}
