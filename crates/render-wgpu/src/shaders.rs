/// Entry point of the vertex stage in [`SCENE_SHADER`].
pub const VERTEX_ENTRY: &str = "vertex_main";
/// Entry point of the fragment stage in [`SCENE_SHADER`].
pub const FRAGMENT_ENTRY: &str = "fragment_main";

/// WGSL for lit scene objects.
///
/// Group and binding numbers follow `BindingSlot::group` and
/// `BindingSlot::index`; struct layouts match `landscape_gpu`'s uniform blocks.
pub const SCENE_SHADER: &str = r#"
struct FrameUniforms {
    view: mat4x4<f32>,
    projection: mat4x4<f32>,
};

struct ModelTransform {
    model: mat4x4<f32>,
    normal: mat3x3<f32>,
};

struct Params {
    camera_position: vec3<f32>,
    light_count: u32,
};

struct Light {
    position: vec3<f32>,
    kind: u32,
    color: vec3<f32>,
    intensity: f32,
    specular_color: vec3<f32>,
    radius: f32,
    attenuation: vec3<f32>,
    cone_angle: f32,
    cone_direction: vec3<f32>,
    cone_attenuation: f32,
};

const BASE_COLOR: vec3<f32> = vec3<f32>(0.8, 0.8, 0.8);
const SHININESS: f32 = 32.0;

@group(0) @binding(11)
var<uniform> camera: FrameUniforms;

@group(1) @binding(10)
var<uniform> transform: ModelTransform;

@group(2) @binding(12)
var<uniform> params: Params;

@group(3) @binding(13)
var<storage, read> lights: array<Light>;

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
};

@vertex
fn vertex_main(vertex: VertexInput) -> VertexOutput {
    let world = transform.model * vec4<f32>(vertex.position, 1.0);

    var out: VertexOutput;
    out.clip_position = camera.projection * camera.view * world;
    out.world_position = world.xyz;
    out.world_normal = normalize(transform.normal * vertex.normal);
    out.uv = vertex.uv;
    return out;
}

fn specular_term(light: Light, to_light: vec3<f32>, normal: vec3<f32>, to_eye: vec3<f32>) -> vec3<f32> {
    let reflected = reflect(-to_light, normal);
    let highlight = pow(max(dot(reflected, to_eye), 0.0), SHININESS);
    return light.specular_color * light.intensity * highlight;
}

fn falloff(light: Light, distance: f32) -> f32 {
    let a = light.attenuation;
    return 1.0 / max(a.x + a.y * distance + a.z * distance * distance, 1e-4);
}

@fragment
fn fragment_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let normal = normalize(in.world_normal);
    let to_eye = normalize(params.camera_position - in.world_position);

    var diffuse = vec3<f32>(0.0);
    var specular = vec3<f32>(0.0);
    var ambient = vec3<f32>(0.0);

    for (var i = 0u; i < params.light_count; i = i + 1u) {
        let light = lights[i];
        switch light.kind {
            case 1u: { // sun
                let to_light = normalize(light.position);
                let lambert = max(dot(normal, to_light), 0.0);
                diffuse += light.color * light.intensity * lambert;
                if lambert > 0.0 {
                    specular += specular_term(light, to_light, normal, to_eye);
                }
            }
            case 3u: { // point
                let offset = light.position - in.world_position;
                let to_light = normalize(offset);
                let lambert = max(dot(normal, to_light), 0.0);
                let weight = falloff(light, length(offset));
                diffuse += light.color * light.intensity * lambert * weight;
                if lambert > 0.0 {
                    specular += specular_term(light, to_light, normal, to_eye) * weight;
                }
            }
            case 2u: { // spot
                let offset = light.position - in.world_position;
                let to_light = normalize(offset);
                let cone = dot(-to_light, normalize(light.cone_direction));
                if cone > cos(light.cone_angle) {
                    let lambert = max(dot(normal, to_light), 0.0);
                    let weight = falloff(light, length(offset)) * pow(cone, light.cone_attenuation);
                    diffuse += light.color * light.intensity * lambert * weight;
                }
            }
            case 4u: { // ambient
                ambient += light.color * light.intensity;
            }
            default: {}
        }
    }

    let color = BASE_COLOR * (diffuse + ambient) + specular;
    return vec4<f32>(color, 1.0);
}
"#;
