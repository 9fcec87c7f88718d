use common::{AppConfig, BlobId, BlobRecord, StorageConfig};
use engine::AssetEngine;
use engine::assembly::NewAssembly;
use engine::metadata::{ModelMetadata, TextureMetadata};
use serde_json::{Value, json};
use tempfile::TempDir;

/// An engine over its own scratch storage, dropped with the test.
pub struct TestEngine {
    pub engine: AssetEngine,
    _dir: Option<TempDir>,
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

impl TestEngine {
    /// Engine over a filesystem root inside a temp directory.
    pub async fn filesystem() -> Self {
        init_tracing();
        let dir = tempfile::tempdir().expect("create temp dir");
        let config = AppConfig {
            storage: StorageConfig {
                root: dir.path().join("data").to_string_lossy().into_owned(),
                max_blob_size: 64 * 1024 * 1024,
            },
        };
        let engine = AssetEngine::open(&config).await.expect("open engine");
        Self {
            engine,
            _dir: Some(dir),
        }
    }

    /// Engine over in-memory stores.
    pub fn memory() -> Self {
        init_tracing();
        Self {
            engine: AssetEngine::in_memory(),
            _dir: None,
        }
    }

    /// Upload a weapon part model and return its record.
    pub async fn upload_part_model(
        &self,
        name: &str,
        weapon_type: &str,
        part_type: &str,
        slots: &[&str],
    ) -> BlobRecord<ModelMetadata> {
        let metadata = json!({
            "name": name,
            "weapon_part": {
                "weapon_type": weapon_type,
                "part_type": part_type,
                "material_slots": slots,
            },
        });
        self.engine
            .models
            .upload(
                b"mesh data",
                &format!("{}.fbx", name.to_lowercase()),
                &metadata.to_string(),
            )
            .await
            .expect("upload part model")
    }

    /// Upload a standalone model with no weapon part metadata.
    pub async fn upload_misc_model(&self, name: &str) -> BlobRecord<ModelMetadata> {
        let metadata = json!({ "name": name });
        self.engine
            .models
            .upload(
                b"mesh data",
                &format!("{}.obj", name.to_lowercase()),
                &metadata.to_string(),
            )
            .await
            .expect("upload misc model")
    }

    /// Upload a diffuse texture and return its record.
    pub async fn upload_texture(&self, name: &str) -> BlobRecord<TextureMetadata> {
        let metadata = json!({ "name": name, "texture_type": "diffuse" });
        self.engine
            .textures
            .upload(
                b"pixels",
                &format!("{}.png", name.to_lowercase()),
                &metadata.to_string(),
            )
            .await
            .expect("upload texture")
    }
}

/// Part payload referencing `model_id`, placed at the origin.
pub fn part(model_id: BlobId, part_type: &str) -> Value {
    json!({
        "model_id": model_id.to_string(),
        "part_type": part_type,
        "position": {"x": 0.0, "y": 0.0, "z": 0.0},
        "rotation": {"x": 0.0, "y": 0.0, "z": 0.0},
    })
}

/// Parse a `NewAssembly` from an inline JSON payload.
pub fn new_assembly(payload: Value) -> NewAssembly {
    serde_json::from_value(payload).expect("parse assembly payload")
}
