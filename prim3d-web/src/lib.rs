/// prim3d Web - browser binding for the procedural solids demo
///
/// Rust owns the scene: it generates the geometry once, keeps the mesh
/// records and computes every per-frame uniform. The JavaScript side
/// uploads the flat buffers once and issues the WebGL draw calls
/// (front face CCW, back-face culling enabled) with the values read back
/// from [`WebRenderer`] each frame.
use nalgebra::{Matrix4, Point3, Vector3, Vector4};
use prim3d_core::{draw_parameters, DrawParameters, MeshInstance, Scene};
use thiserror::Error;
use tracing::info;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::HtmlCanvasElement;

/// Failures surfaced to JavaScript
#[derive(Debug, Error, PartialEq)]
pub enum WebError {
    #[error("no global window object")]
    NoWindow,
    #[error("window has no document")]
    NoDocument,
    #[error("no element with id '{0}'")]
    CanvasNotFound(String),
    #[error("element '{0}' is not a canvas")]
    NotACanvas(String),
    #[error("mesh index {index} out of range (scene has {count} meshes)")]
    MeshIndex { index: usize, count: usize },
}

impl From<WebError> for JsValue {
    fn from(error: WebError) -> Self {
        JsValue::from_str(&error.to_string())
    }
}

fn find_canvas(id: &str) -> Result<HtmlCanvasElement, WebError> {
    let window = web_sys::window().ok_or(WebError::NoWindow)?;
    let document = window.document().ok_or(WebError::NoDocument)?;
    let element = document
        .get_element_by_id(id)
        .ok_or_else(|| WebError::CanvasNotFound(id.to_string()))?;
    element
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|_| WebError::NotACanvas(id.to_string()))
}

fn matrix_buffer(matrix: &Matrix4<f32>) -> Vec<f32> {
    // nalgebra storage is column-major, as WebGL expects
    matrix.as_slice().to_vec()
}

fn color_buffer(color: &Vector4<f32>) -> Vec<f32> {
    color.as_slice().to_vec()
}

fn point_buffer(point: &Point3<f32>) -> Vec<f32> {
    vec![point.x, point.y, point.z]
}

/// Scene plus frame counter, independent of the DOM
#[derive(Debug, Clone)]
pub struct SceneState {
    scene: Scene,
    tick: u64,
}

impl SceneState {
    pub fn new(scene: Scene) -> Self {
        Self { scene, tick: 0 }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn advance(&mut self) {
        self.tick += 1;
    }

    pub fn mesh(&self, index: usize) -> Result<&MeshInstance, WebError> {
        let count = self.scene.meshes.len();
        self.scene
            .meshes
            .get(index)
            .ok_or(WebError::MeshIndex { index, count })
    }

    pub fn mesh_mut(&mut self, index: usize) -> Result<&mut MeshInstance, WebError> {
        let count = self.scene.meshes.len();
        self.scene
            .meshes
            .get_mut(index)
            .ok_or(WebError::MeshIndex { index, count })
    }

    /// Draw parameters of mesh `index` for the current tick
    pub fn parameters(&self, index: usize, aspect: f32) -> Result<DrawParameters, WebError> {
        let mesh = self.mesh(index)?;
        Ok(draw_parameters(
            mesh,
            &self.scene.camera,
            &self.scene.lighting,
            aspect,
            self.tick,
        ))
    }
}

/// Handle the page's draw loop talks to
#[wasm_bindgen]
pub struct WebRenderer {
    canvas: HtmlCanvasElement,
    state: SceneState,
}

impl WebRenderer {
    /// Viewport aspect, re-read from the canvas every frame
    fn aspect(&self) -> f32 {
        self.canvas.width() as f32 / self.canvas.height().max(1) as f32
    }
}

#[wasm_bindgen]
impl WebRenderer {
    /// Bind to the canvas with the given element id and build the demo scene
    #[wasm_bindgen(constructor)]
    pub fn new(canvas_id: &str) -> Result<WebRenderer, JsValue> {
        let canvas = find_canvas(canvas_id)?;
        let state = SceneState::new(Scene::demo());
        info!(canvas_id, meshes = state.scene().meshes.len(), "web renderer ready");
        Ok(WebRenderer { canvas, state })
    }

    /// Advance the spin animation by one frame
    pub fn frame(&mut self) {
        self.state.advance();
    }

    pub fn mesh_count(&self) -> usize {
        self.state.scene().meshes.len()
    }

    /// Vertex positions of mesh `index`, `[x, y, z]` per vertex
    pub fn positions(&self, index: usize) -> Result<Vec<f32>, JsValue> {
        Ok(self.state.mesh(index)?.geometry.position_buffer())
    }

    /// Vertex normals of mesh `index`, `[x, y, z]` per vertex
    pub fn normals(&self, index: usize) -> Result<Vec<f32>, JsValue> {
        Ok(self.state.mesh(index)?.geometry.normal_buffer())
    }

    /// Triangle indices of mesh `index`, three per triangle
    pub fn indices(&self, index: usize) -> Result<Vec<u32>, JsValue> {
        Ok(self.state.mesh(index)?.geometry.index_buffer())
    }

    pub fn set_position(&mut self, index: usize, x: f32, y: f32, z: f32) -> Result<(), JsValue> {
        self.state.mesh_mut(index)?.position = Vector3::new(x, y, z);
        Ok(())
    }

    pub fn set_color(&mut self, index: usize, r: f32, g: f32, b: f32, a: f32) -> Result<(), JsValue> {
        self.state.mesh_mut(index)?.color = Vector4::new(r, g, b, a);
        Ok(())
    }

    pub fn model_matrix(&self, index: usize) -> Result<Vec<f32>, JsValue> {
        Ok(matrix_buffer(&self.state.parameters(index, self.aspect())?.model))
    }

    /// Inverse-transpose of the model matrix
    pub fn normal_matrix(&self, index: usize) -> Result<Vec<f32>, JsValue> {
        Ok(matrix_buffer(&self.state.parameters(index, self.aspect())?.normal))
    }

    pub fn color(&self, index: usize) -> Result<Vec<f32>, JsValue> {
        Ok(color_buffer(&self.state.mesh(index)?.color))
    }

    pub fn view_matrix(&self) -> Vec<f32> {
        matrix_buffer(&self.state.scene().camera.view_matrix())
    }

    /// Perspective projection for the canvas' current size
    pub fn projection_matrix(&self) -> Vec<f32> {
        matrix_buffer(&self.state.scene().camera.projection_matrix(self.aspect()))
    }

    pub fn ambient_color(&self) -> Vec<f32> {
        color_buffer(&self.state.scene().lighting.ambient)
    }

    pub fn light_color(&self) -> Vec<f32> {
        color_buffer(&self.state.scene().lighting.light_color)
    }

    pub fn light_position(&self) -> Vec<f32> {
        point_buffer(&self.state.scene().lighting.light_position)
    }

    pub fn eye(&self) -> Vec<f32> {
        point_buffer(&self.state.scene().camera.eye)
    }
}
