use crate::error::assertion_error::AssertionError;
use crate::error::assertion_error_enums::AssertionErrorKind;
use crate::golden::resource_path::ResourcePath;
use crate::logging::syslog::trace;

/// Loads expected-body snapshots stored under a resource root.
#[derive(Clone, Debug)]
pub struct GoldenResourceLoader {
    resource_root: String,
}

impl GoldenResourceLoader {
    pub fn new(resource_root: &str) -> Self {
        GoldenResourceLoader {
            resource_root: resource_root.to_string(),
        }
    }

    pub fn resource_root(&self) -> &str {
        &self.resource_root
    }

    pub async fn load(&self, path: &str) -> Result<Vec<u8>, AssertionError> {
        let resolved = ResourcePath::new(&self.resource_root, path).map_err(|e| AssertionError::new(AssertionErrorKind::ResourceNotFound, e))?;

        match tokio::fs::read(resolved.get_full_path()).await {
            Ok(content) => {
                trace(format!("Loaded golden resource {} ({} bytes)", resolved.get_full_path(), content.len()));
                Ok(content)
            }
            Err(e) => Err(AssertionError::new(
                AssertionErrorKind::ResourceNotFound,
                format!("Golden resource '{}' could not be read from '{}': {}", path, resolved.get_full_path(), e),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_load_existing_resource() {
        let root = std::env::temp_dir().join(format!("http-assert-golden-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(root.join("servlet")).unwrap();
        std::fs::write(root.join("servlet/Hello.html"), b"hello ${host}").unwrap();

        let loader = GoldenResourceLoader::new(&root.to_string_lossy());
        let content = loader.load("servlet/Hello.html").await.unwrap();
        assert_eq!(content, b"hello ${host}".to_vec());

        let _ = std::fs::remove_dir_all(root);
    }

    #[tokio::test]
    async fn test_missing_resource_is_resource_not_found() {
        let loader = GoldenResourceLoader::new("./no-such-root");
        let err = loader.load("missing.html").await.unwrap_err();
        assert_eq!(err.kind, AssertionErrorKind::ResourceNotFound);
        assert!(err.message.contains("missing.html"));

        let err = loader.load("../outside.html").await.unwrap_err();
        assert_eq!(err.kind, AssertionErrorKind::ResourceNotFound);
    }
}
