use std::path::PathBuf;
use std::sync::Arc;

use crate::application::ports::{AudioStore, AudioStoreError};
use crate::presentation::config::{StorageProviderSetting, StorageSettings};

use super::object_audio_store::ObjectAudioStore;

pub struct AudioStoreFactory;

impl AudioStoreFactory {
    pub fn create(settings: &StorageSettings) -> Result<Arc<dyn AudioStore>, AudioStoreError> {
        match settings.provider {
            StorageProviderSetting::Local => {
                let path = PathBuf::from(&settings.local_path);
                let store = ObjectAudioStore::local(path)?;
                Ok(Arc::new(store))
            }
            StorageProviderSetting::Gcs => {
                let store = ObjectAudioStore::gcs(
                    &settings.bucket,
                    settings.gcs_service_account_path.as_deref(),
                )?;
                Ok(Arc::new(store))
            }
            StorageProviderSetting::Memory => Ok(Arc::new(ObjectAudioStore::in_memory())),
        }
    }
}
