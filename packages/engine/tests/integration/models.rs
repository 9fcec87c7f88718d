use common::BlobId;
use engine::AssetError;
use engine::service::ModelFilter;
use engine::taxonomy::{PartType, WeaponType};
use serde_json::json;

use crate::common::TestEngine;

mod model_upload {
    use super::*;

    #[tokio::test]
    async fn stores_weapon_part_under_hierarchical_key() {
        let app = TestEngine::filesystem().await;
        let metadata = json!({
            "name": "Steel Blade",
            "weapon_part": {
                "weapon_type": "sword",
                "part_type": "blade",
                "material_slots": ["blade_mat"],
            },
        });
        let record = app
            .engine
            .models
            .upload(b"mesh bytes", "export.fbx", &metadata.to_string())
            .await
            .unwrap();

        assert_eq!(record.key, "models/weapons/sword/blade/base/steel_blade.fbx");
        assert_eq!(record.filename, "export.fbx");
        assert_eq!(record.content_type, "application/octet-stream");
        assert_eq!(record.size_bytes, 10);
        assert_eq!(record.metadata.format.as_deref(), Some("fbx"));
        assert!(record.metadata.is_weapon_part());
    }

    #[tokio::test]
    async fn variant_and_category_shape_the_key() {
        let app = TestEngine::filesystem().await;
        let metadata = json!({
            "name": "Gilded Blade",
            "category": "Legendary Items",
            "weapon_part": {
                "weapon_type": "sword",
                "part_type": "blade",
                "variant": "Gold Trim",
            },
        });
        let record = app
            .engine
            .models
            .upload(b"mesh", "gilded.fbx", &metadata.to_string())
            .await
            .unwrap();

        assert_eq!(
            record.key,
            "models/legendary_items/sword/blade/variants/gold_trim/gilded_blade.fbx"
        );
    }

    #[tokio::test]
    async fn standalone_model_lands_under_misc() {
        let app = TestEngine::filesystem().await;
        let record = app.upload_misc_model("Crate").await;
        assert_eq!(record.key, "models/misc/crate.obj");
        assert!(!record.metadata.is_weapon_part());
    }

    #[tokio::test]
    async fn usda_is_stored_as_text() {
        let app = TestEngine::memory();
        let record = app
            .engine
            .models
            .upload(b"#usda 1.0", "scene.usda", &json!({"name": "Scene"}).to_string())
            .await
            .unwrap();
        assert_eq!(record.content_type, "text/plain");
    }

    #[tokio::test]
    async fn declared_format_beats_filename_extension() {
        let app = TestEngine::memory();
        let record = app
            .engine
            .models
            .upload(
                b"mesh",
                "upload.tmp",
                &json!({"name": "Declared", "format": "GLB"}).to_string(),
            )
            .await
            .unwrap();
        assert_eq!(record.metadata.format.as_deref(), Some("glb"));
        assert_eq!(record.key, "models/misc/declared.glb");
    }

    #[tokio::test]
    async fn missing_format_and_extension_is_rejected() {
        let app = TestEngine::memory();
        let result = app
            .engine
            .models
            .upload(b"mesh", "no_extension", &json!({"name": "Bare"}).to_string())
            .await;
        assert!(matches!(result, Err(AssetError::InvalidMetadata(_))));
    }

    #[tokio::test]
    async fn malformed_metadata_is_rejected() {
        let app = TestEngine::memory();
        let result = app
            .engine
            .models
            .upload(b"mesh", "broken.fbx", "{not json")
            .await;
        assert!(matches!(result, Err(AssetError::InvalidMetadata(_))));

        let unknown_weapon = json!({
            "name": "Katana Blade",
            "weapon_part": {"weapon_type": "katana", "part_type": "blade"},
        });
        let result = app
            .engine
            .models
            .upload(b"mesh", "katana.fbx", &unknown_weapon.to_string())
            .await;
        assert!(matches!(result, Err(AssetError::InvalidMetadata(_))));
    }

    #[tokio::test]
    async fn incompatible_pair_is_accepted_at_upload() {
        // Weapon and part only have to agree when parts are assembled.
        let app = TestEngine::memory();
        let record = app.upload_part_model("Odd Blade", "rifle", "blade", &[]).await;
        assert_eq!(record.key, "models/weapons/rifle/blade/base/odd_blade.fbx");
    }

    #[tokio::test]
    async fn name_is_sanitized_in_the_key() {
        let app = TestEngine::memory();
        let record = app
            .engine
            .models
            .upload(
                b"mesh",
                "fancy.fbx",
                &json!({"name": "  Bäd  Name!  "}).to_string(),
            )
            .await
            .unwrap();
        assert_eq!(record.key, "models/misc/b_d_name.fbx");
    }
}

mod model_get {
    use super::*;

    #[tokio::test]
    async fn round_trips_bytes_and_record() {
        let app = TestEngine::filesystem().await;
        let uploaded = app.upload_part_model("Oak Handle", "sword", "handle", &[]).await;

        let (bytes, record) = app
            .engine
            .models
            .get(&uploaded.id.to_string())
            .await
            .unwrap();
        assert_eq!(bytes, b"mesh data");
        assert_eq!(record, uploaded);
    }

    #[tokio::test]
    async fn invalid_id_is_rejected_before_storage() {
        let app = TestEngine::memory();
        let result = app.engine.models.get("not-a-uuid").await;
        assert!(matches!(result, Err(AssetError::InvalidIdentifier(_))));
    }

    #[tokio::test]
    async fn unknown_id_is_not_found() {
        let app = TestEngine::memory();
        let result = app.engine.models.get(&BlobId::generate().to_string()).await;
        assert!(matches!(result, Err(AssetError::NotFound(_))));
    }

    #[tokio::test]
    async fn filename_lookup_returns_latest_upload() {
        let app = TestEngine::filesystem().await;
        app.engine
            .models
            .upload(b"first", "shared.fbx", &json!({"name": "First"}).to_string())
            .await
            .unwrap();
        app.engine
            .models
            .upload(b"second", "shared.fbx", &json!({"name": "Second"}).to_string())
            .await
            .unwrap();

        let (bytes, record) = app.engine.models.get_by_filename("shared.fbx").await.unwrap();
        assert_eq!(bytes, b"second");
        assert_eq!(record.metadata.name, "Second");

        let missing = app.engine.models.get_by_filename("shared").await;
        assert!(matches!(missing, Err(AssetError::NotFound(_))));
    }
}

mod model_list {
    use super::*;

    #[tokio::test]
    async fn filters_narrow_by_weapon_part_and_tag() {
        let app = TestEngine::filesystem().await;
        app.upload_part_model("Blade A", "sword", "blade", &[]).await;
        app.upload_part_model("Blade B", "sword", "blade", &[]).await;
        app.upload_part_model("Barrel", "rifle", "barrel", &[]).await;
        app.engine
            .models
            .upload(
                b"mesh",
                "tagged.obj",
                &json!({"name": "Tagged", "tags": ["hero", "quest"]}).to_string(),
            )
            .await
            .unwrap();

        let all = app.engine.models.list(&ModelFilter::default(), 0, 0).await.unwrap();
        assert_eq!(all.total, 4);

        let swords = app
            .engine
            .models
            .list(
                &ModelFilter {
                    weapon_type: Some(WeaponType::Sword),
                    ..Default::default()
                },
                0,
                0,
            )
            .await
            .unwrap();
        assert_eq!(swords.total, 2);

        let barrels = app
            .engine
            .models
            .list(
                &ModelFilter {
                    part_type: Some(PartType::Barrel),
                    ..Default::default()
                },
                0,
                0,
            )
            .await
            .unwrap();
        assert_eq!(barrels.total, 1);
        assert_eq!(barrels.items[0].metadata.name, "Barrel");

        let tagged = app
            .engine
            .models
            .list(
                &ModelFilter {
                    tag: Some("hero".to_string()),
                    ..Default::default()
                },
                0,
                0,
            )
            .await
            .unwrap();
        assert_eq!(tagged.total, 1);
        assert_eq!(tagged.items[0].metadata.name, "Tagged");
    }

    #[tokio::test]
    async fn pages_keep_the_full_match_count() {
        let app = TestEngine::filesystem().await;
        for i in 0..5 {
            app.upload_misc_model(&format!("Model {i}")).await;
        }

        let page = app.engine.models.list(&ModelFilter::default(), 2, 2).await.unwrap();
        assert_eq!(page.total, 5);
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.skip, 2);
        assert_eq!(page.limit, 2);
        // Listings run oldest first, so skip 2 lands on the third upload.
        assert_eq!(page.items[0].metadata.name, "Model 2");

        let defaulted = app.engine.models.list(&ModelFilter::default(), 0, 0).await.unwrap();
        assert_eq!(defaulted.limit, 100);
        assert_eq!(defaulted.items.len(), 5);
    }

    #[tokio::test]
    async fn parts_for_weapon_narrows_to_part_type() {
        let app = TestEngine::filesystem().await;
        app.upload_part_model("Sword Blade", "sword", "blade", &[]).await;
        app.upload_part_model("Sword Guard", "sword", "guard", &[]).await;
        app.upload_misc_model("Not A Part").await;

        let parts = app
            .engine
            .models
            .list_parts_for_weapon(WeaponType::Sword, None, 0, 0)
            .await
            .unwrap();
        assert_eq!(parts.total, 2);

        let blades = app
            .engine
            .models
            .list_parts_for_weapon(WeaponType::Sword, Some(PartType::Blade), 0, 0)
            .await
            .unwrap();
        assert_eq!(blades.total, 1);
        assert_eq!(blades.items[0].metadata.name, "Sword Blade");
    }
}

mod model_delete {
    use super::*;

    #[tokio::test]
    async fn deleted_models_stop_resolving() {
        let app = TestEngine::filesystem().await;
        let record = app.upload_misc_model("Doomed").await;
        let id = record.id.to_string();

        app.engine.models.delete(&id).await.unwrap();
        assert!(matches!(
            app.engine.models.get(&id).await,
            Err(AssetError::NotFound(_))
        ));
        assert!(matches!(
            app.engine.models.delete(&id).await,
            Err(AssetError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn memory_backend_matches_filesystem_behavior() {
        let app = TestEngine::memory();
        let record = app.upload_part_model("Ephemeral", "sword", "blade", &[]).await;
        assert_eq!(record.key, "models/weapons/sword/blade/base/ephemeral.fbx");

        let (bytes, _) = app.engine.models.get(&record.id.to_string()).await.unwrap();
        assert_eq!(bytes, b"mesh data");

        app.engine.models.delete(&record.id.to_string()).await.unwrap();
        assert!(matches!(
            app.engine.models.get(&record.id.to_string()).await,
            Err(AssetError::NotFound(_))
        ));
    }
}
