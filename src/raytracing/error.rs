use thiserror::Error;

/// Problems detected while building a scene, before any ray is cast.
#[derive(Error, Debug)]
pub enum SceneError {
    #[error("face {face} references vertex {index}, but the mesh has only {vertices} vertices")]
    FaceIndexOutOfRange {
        face: usize,
        index: usize,
        vertices: usize,
    },

    #[error("face {face} has zero area")]
    DegenerateTriangle { face: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("OBJ error: {0}")]
    Obj(#[from] obj::ObjError),
}

pub type Result<T> = std::result::Result<T, SceneError>;
