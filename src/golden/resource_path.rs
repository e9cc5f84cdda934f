use crate::logging::syslog::debug;

/// A golden resource path resolved against the resource root. Paths that would
/// leave the root through `..` are rejected.
#[derive(Clone, Debug, PartialEq)]
pub struct ResourcePath {
    resource_root: String,
    path: String,
    full_path: String,
}

impl ResourcePath {
    pub fn new(resource_root: &str, path: &str) -> Result<Self, String> {
        let mut resource_root = resource_root.trim().replace('\\', "/");
        while resource_root.len() > 1 && resource_root.ends_with('/') {
            resource_root.pop();
        }

        let cleaned = Self::clean_relative_path(path.trim())?;
        if cleaned.is_empty() {
            return Err(format!("Resource path {:?} does not name a file", path));
        }

        let full_path = if resource_root.is_empty() || resource_root == "." {
            cleaned.clone()
        } else if resource_root == "/" {
            format!("/{}", cleaned)
        } else {
            format!("{}/{}", resource_root, cleaned)
        };

        Ok(ResourcePath {
            resource_root,
            path: cleaned,
            full_path,
        })
    }

    pub fn get_full_path(&self) -> &str {
        &self.full_path
    }

    pub fn get_resource_root(&self) -> &str {
        &self.resource_root
    }

    pub fn get_path(&self) -> &str {
        &self.path
    }

    fn clean_relative_path(path: &str) -> Result<String, String> {
        let path = path.replace('\\', "/");
        let mut segments: Vec<&str> = Vec::new();

        for segment in path.split('/') {
            match segment {
                "" | "." => {}
                ".." => {
                    if segments.pop().is_none() {
                        debug(format!("Rejected resource path escaping the resource root: {}", path));
                        return Err(format!("Resource path {:?} escapes the resource root", path));
                    }
                }
                s => segments.push(s),
            }
        }

        Ok(segments.join("/"))
    }
}
