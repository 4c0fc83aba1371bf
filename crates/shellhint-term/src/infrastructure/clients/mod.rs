pub mod ollama;

use anyhow::bail;
use anyhow::Result;

use crate::domain::models::BackendClientBox;
use crate::domain::models::BackendName;

pub struct BackendClientManager {}

impl BackendClientManager {
    pub fn get(name: BackendName) -> Result<BackendClientBox> {
        if name == BackendName::Ollama {
            return Ok(Box::new(ollama::Ollama::from_config()?));
        }

        bail!(format!("No backend implemented for {name}"))
    }
}
