//! WebGL2 implementation of the GPU layer.
//!
//! One Blinn-Phong program is compiled at startup and shared by every model.
//! Lighting is done in view space so the eye sits at the origin.

use bytemuck::{Pod, Zeroable};
use nalgebra::Matrix4;
use orbview_core::{GpuBackend, GpuError, Mesh, Uniforms, ViewRect};
use web_sys::{
    WebGl2RenderingContext as Gl, WebGlBuffer, WebGlProgram, WebGlShader, WebGlUniformLocation,
    WebGlVertexArrayObject,
};

const VERTEX_SHADER: &str = r#"#version 300 es
layout(location = 0) in vec3 a_position;
layout(location = 1) in vec3 a_normal;

uniform mat4 u_projection;
uniform mat4 u_view;
uniform mat4 u_model;

out vec3 v_position;
out vec3 v_normal;

void main() {
    mat4 model_view = u_view * u_model;
    vec4 position = model_view * vec4(a_position, 1.0);
    v_position = position.xyz;
    v_normal = mat3(model_view) * a_normal;
    gl_Position = u_projection * position;
}
"#;

const FRAGMENT_SHADER: &str = r#"#version 300 es
precision mediump float;

in vec3 v_position;
in vec3 v_normal;

uniform mat4 u_view;
uniform vec3 u_ambient;
uniform vec3 u_diffuse;
uniform vec3 u_specular;
uniform vec3 u_light_position;
uniform float u_shininess;
uniform bool u_blinn_phong;

out vec4 frag_color;

void main() {
    vec3 n = normalize(v_normal);
    vec3 light = (u_view * vec4(u_light_position, 1.0)).xyz;
    vec3 l = normalize(light - v_position);
    vec3 v = normalize(-v_position);

    float lambert = max(dot(n, l), 0.0);
    float specular = 0.0;
    if (lambert > 0.0) {
        if (u_blinn_phong) {
            vec3 h = normalize(l + v);
            specular = pow(max(dot(n, h), 0.0), u_shininess);
        } else {
            vec3 r = reflect(-l, n);
            specular = pow(max(dot(r, v), 0.0), u_shininess / 4.0);
        }
    }
    frag_color = vec4(u_ambient + lambert * u_diffuse + specular * u_specular, 1.0);
}
"#;

const POSITION_ATTRIB: u32 = 0;
const NORMAL_ATTRIB: u32 = 1;

#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
struct GpuVertex {
    position: [f32; 3],
    normal: [f32; 3],
}

/// Vertex array and buffers of one uploaded mesh
pub struct MeshBuffers {
    vao: WebGlVertexArrayObject,
    vertices: WebGlBuffer,
    indices: WebGlBuffer,
    index_count: i32,
}

struct UniformLocations {
    projection: Option<WebGlUniformLocation>,
    view: Option<WebGlUniformLocation>,
    model: Option<WebGlUniformLocation>,
    ambient: Option<WebGlUniformLocation>,
    diffuse: Option<WebGlUniformLocation>,
    specular: Option<WebGlUniformLocation>,
    light_position: Option<WebGlUniformLocation>,
    shininess: Option<WebGlUniformLocation>,
    blinn_phong: Option<WebGlUniformLocation>,
}

impl UniformLocations {
    fn new(gl: &Gl, program: &WebGlProgram) -> Self {
        let at = |name: &str| gl.get_uniform_location(program, name);
        Self {
            projection: at("u_projection"),
            view: at("u_view"),
            model: at("u_model"),
            ambient: at("u_ambient"),
            diffuse: at("u_diffuse"),
            specular: at("u_specular"),
            light_position: at("u_light_position"),
            shininess: at("u_shininess"),
            blinn_phong: at("u_blinn_phong"),
        }
    }
}

pub struct WebGlBackend {
    gl: Gl,
    program: WebGlProgram,
    locations: UniformLocations,
}

impl WebGlBackend {
    pub fn new(gl: Gl) -> Result<Self, GpuError> {
        let vertex = compile_shader(&gl, Gl::VERTEX_SHADER, VERTEX_SHADER)?;
        let fragment = compile_shader(&gl, Gl::FRAGMENT_SHADER, FRAGMENT_SHADER)?;
        let program = link_program(&gl, &vertex, &fragment)?;
        gl.delete_shader(Some(&vertex));
        gl.delete_shader(Some(&fragment));

        let locations = UniformLocations::new(&gl, &program);
        Ok(Self {
            gl,
            program,
            locations,
        })
    }

    fn set_matrix(&self, location: &Option<WebGlUniformLocation>, matrix: &Matrix4<f32>) {
        self.gl
            .uniform_matrix4fv_with_f32_array(location.as_ref(), false, matrix.as_slice());
    }
}

impl GpuBackend for WebGlBackend {
    type Buffers = MeshBuffers;

    fn upload(&mut self, mesh: &Mesh) -> Result<MeshBuffers, GpuError> {
        let gl = &self.gl;
        let vertices: Vec<GpuVertex> = mesh
            .vertices
            .iter()
            .map(|v| GpuVertex {
                position: [v.position.x, v.position.y, v.position.z],
                normal: [v.normal.x, v.normal.y, v.normal.z],
            })
            .collect();

        let vao = gl
            .create_vertex_array()
            .ok_or_else(|| GpuError::Buffer("vertex array".into()))?;
        let Some(vertex_buffer) = gl.create_buffer() else {
            gl.delete_vertex_array(Some(&vao));
            return Err(GpuError::Buffer("vertex buffer".into()));
        };
        let Some(index_buffer) = gl.create_buffer() else {
            gl.delete_buffer(Some(&vertex_buffer));
            gl.delete_vertex_array(Some(&vao));
            return Err(GpuError::Buffer("index buffer".into()));
        };

        gl.bind_vertex_array(Some(&vao));

        gl.bind_buffer(Gl::ARRAY_BUFFER, Some(&vertex_buffer));
        gl.buffer_data_with_u8_array(
            Gl::ARRAY_BUFFER,
            bytemuck::cast_slice(&vertices),
            Gl::STATIC_DRAW,
        );

        let stride = std::mem::size_of::<GpuVertex>() as i32;
        gl.enable_vertex_attrib_array(POSITION_ATTRIB);
        gl.vertex_attrib_pointer_with_i32(POSITION_ATTRIB, 3, Gl::FLOAT, false, stride, 0);
        gl.enable_vertex_attrib_array(NORMAL_ATTRIB);
        gl.vertex_attrib_pointer_with_i32(NORMAL_ATTRIB, 3, Gl::FLOAT, false, stride, 12);

        gl.bind_buffer(Gl::ELEMENT_ARRAY_BUFFER, Some(&index_buffer));
        gl.buffer_data_with_u8_array(
            Gl::ELEMENT_ARRAY_BUFFER,
            bytemuck::cast_slice(&mesh.indices),
            Gl::STATIC_DRAW,
        );

        gl.bind_vertex_array(None);

        Ok(MeshBuffers {
            vao,
            vertices: vertex_buffer,
            indices: index_buffer,
            index_count: mesh.indices.len() as i32,
        })
    }

    fn release(&mut self, buffers: MeshBuffers) {
        self.gl.delete_vertex_array(Some(&buffers.vao));
        self.gl.delete_buffer(Some(&buffers.vertices));
        self.gl.delete_buffer(Some(&buffers.indices));
    }

    fn set_viewport(&mut self, rect: ViewRect) {
        self.gl.viewport(
            rect.x as i32,
            rect.y as i32,
            rect.width as i32,
            rect.height as i32,
        );
    }

    fn enable_scissor(&mut self, rect: ViewRect) {
        self.gl.enable(Gl::SCISSOR_TEST);
        self.gl.scissor(
            rect.x as i32,
            rect.y as i32,
            rect.width as i32,
            rect.height as i32,
        );
    }

    fn disable_scissor(&mut self) {
        self.gl.disable(Gl::SCISSOR_TEST);
    }

    fn clear(&mut self, color: [f32; 4], depth: f32) {
        let [r, g, b, a] = color;
        self.gl.clear_color(r, g, b, a);
        self.gl.clear_depth(depth);
        self.gl.clear(Gl::COLOR_BUFFER_BIT | Gl::DEPTH_BUFFER_BIT);
    }

    fn enable_depth_test(&mut self) {
        self.gl.enable(Gl::DEPTH_TEST);
    }

    fn draw(&mut self, buffers: &MeshBuffers, uniforms: &Uniforms) {
        let gl = &self.gl;
        let locations = &self.locations;
        let material = &uniforms.material;

        gl.use_program(Some(&self.program));
        self.set_matrix(&locations.projection, &uniforms.projection);
        self.set_matrix(&locations.view, &uniforms.view);
        self.set_matrix(&locations.model, &uniforms.model);
        gl.uniform3fv_with_f32_array(locations.ambient.as_ref(), &material.ambient);
        gl.uniform3fv_with_f32_array(locations.diffuse.as_ref(), &material.diffuse);
        gl.uniform3fv_with_f32_array(locations.specular.as_ref(), &material.specular);
        gl.uniform3fv_with_f32_array(
            locations.light_position.as_ref(),
            material.light_position.coords.as_slice(),
        );
        gl.uniform1f(locations.shininess.as_ref(), material.shininess);
        gl.uniform1i(locations.blinn_phong.as_ref(), i32::from(material.blinn_phong));

        gl.bind_vertex_array(Some(&buffers.vao));
        gl.draw_elements_with_i32(Gl::TRIANGLES, buffers.index_count, Gl::UNSIGNED_INT, 0);
        gl.bind_vertex_array(None);
    }
}

fn compile_shader(gl: &Gl, kind: u32, source: &str) -> Result<WebGlShader, GpuError> {
    let shader = gl
        .create_shader(kind)
        .ok_or_else(|| GpuError::Program("unable to create shader".into()))?;
    gl.shader_source(&shader, source);
    gl.compile_shader(&shader);

    if gl
        .get_shader_parameter(&shader, Gl::COMPILE_STATUS)
        .as_bool()
        .unwrap_or(false)
    {
        Ok(shader)
    } else {
        let log = gl.get_shader_info_log(&shader).unwrap_or_default();
        gl.delete_shader(Some(&shader));
        Err(GpuError::Program(log))
    }
}

fn link_program(
    gl: &Gl,
    vertex: &WebGlShader,
    fragment: &WebGlShader,
) -> Result<WebGlProgram, GpuError> {
    let program = gl
        .create_program()
        .ok_or_else(|| GpuError::Program("unable to create program".into()))?;
    gl.attach_shader(&program, vertex);
    gl.attach_shader(&program, fragment);
    gl.link_program(&program);

    if gl
        .get_program_parameter(&program, Gl::LINK_STATUS)
        .as_bool()
        .unwrap_or(false)
    {
        Ok(program)
    } else {
        let log = gl.get_program_info_log(&program).unwrap_or_default();
        gl.delete_program(Some(&program));
        Err(GpuError::Program(log))
    }
}
