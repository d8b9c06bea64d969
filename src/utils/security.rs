use std::fmt;
use std::path::{Component, Path};

//===============
// Path Handling
//===============
#[derive(Debug, PartialEq, Eq)]
pub enum PathValidationError {
    ContainsParentDir,
    AbsolutePath,
    InvalidComponent,
    NullByte,
    Empty,
}

impl fmt::Display for PathValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathValidationError::ContainsParentDir => {
                write!(f, "Path contains parent directory (..)")
            }
            PathValidationError::AbsolutePath => write!(f, "Path is absolute"),
            PathValidationError::InvalidComponent => write!(f, "Path contains invalid component"),
            PathValidationError::NullByte => write!(f, "Path contains null byte"),
            PathValidationError::Empty => write!(f, "Path is empty"),
        }
    }
}

impl std::error::Error for PathValidationError {}

// Checks for: empty strings, null bytes, parent directory traversal, absolute paths
fn validate_path_components(path_str: &str) -> Result<(), PathValidationError> {
    if path_str.is_empty() {
        return Err(PathValidationError::Empty);
    }

    // rust uses C-style APIs so \0 can end str early
    if path_str.contains('\0') {
        return Err(PathValidationError::NullByte);
    }

    for component in Path::new(path_str).components() {
        match component {
            Component::Normal(_) => continue,
            Component::ParentDir => return Err(PathValidationError::ContainsParentDir),
            Component::RootDir => return Err(PathValidationError::AbsolutePath),
            Component::CurDir => return Err(PathValidationError::InvalidComponent),
            Component::Prefix(_) => return Err(PathValidationError::InvalidComponent), // Windows
        }
    }

    Ok(())
}

/// Reduce a client-declared upload name to the bare file name it will be saved as.
///
/// Browsers normally send just the name, but some send a full client path
/// (`C:\Users\me\cat.jpg`), so everything up to the last separator is dropped.
/// The remaining name must still be a single, normal path component.
pub fn upload_file_name(declared: &str) -> Result<String, PathValidationError> {
    if declared.contains('\0') {
        return Err(PathValidationError::NullByte);
    }

    let base = declared
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(declared);

    validate_path_components(base)?;
    Ok(base.to_string())
}
