use std::io::Write;
use std::path::Path;
pub mod stl;

#[derive(Debug)]
pub enum IoErrorType {
    File(std::io::Error),
    SerdeJson(serde_json::Error),
    SerdeYaml(serde_yaml::Error),
    TomlDe(toml::de::Error),
    StringOnly(String),
}
impl std::fmt::Display for IoErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IoErrorType::File(error) => write!(f, "- File IO Error:\n{}", error),
            IoErrorType::SerdeJson(error) => write!(f, "- JSON Serialization/Deserialization Error:\n{}", error),
            IoErrorType::SerdeYaml(error) => write!(f, "- YAML Serialization/Deserialization Error:\n{}", error),
            IoErrorType::TomlDe(error) => write!(f, "- TOML Deserialization Error:\n{}", error),
            IoErrorType::StringOnly(error) => write!(f, "- {}", error),
        }
    }
}

/// Custom verbose IO error struct.
#[derive(Debug)]
pub struct IoError {
    /// Filepath facing an error.
    pub file: Option<String>,
    /// Error cause.
    pub cause: IoErrorType,
}
impl IoError {
    fn at<P: AsRef<Path>>(path: P, cause: IoErrorType) -> Self {
        IoError{file: Some(path.as_ref().display().to_string()), cause}
    }
}
impl std::fmt::Display for IoError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.file {
            Some(ref file) => write!(f, "- Error with file: {}\n{}", file, self.cause),
            None => write!(f, "{}", self.cause),
        }
    }
}

pub type IoResult<T> = std::result::Result<T, IoError>;

/// Open a file with verbose errors.
pub fn open<P: AsRef<Path>>(path: P) -> IoResult<std::fs::File> {
    std::fs::File::open(&path).map_err(|error| IoError::at(&path, IoErrorType::File(error)))
}

/// Create a file with verbose errors.
pub fn create<P: AsRef<Path>>(path: P) -> IoResult<std::fs::File> {
    std::fs::File::create(&path).map_err(|error| IoError::at(&path, IoErrorType::File(error)))
}

/// Read from string with verbose errors
pub fn read_to_string<P: AsRef<Path>>(path: P) -> IoResult<String> {
    std::fs::read_to_string(&path).map_err(|error| IoError::at(&path, IoErrorType::File(error)))
}

/// Write string to file with verbose errors.
pub fn write_to_file<P: AsRef<Path>>(path: P, buffer: &str) -> IoResult<()> {
    let mut f = create(&path)?;
    f.write_all(buffer.as_bytes()).map_err(|error| IoError::at(&path, IoErrorType::File(error)))
}

/// Create a directory and its parents with verbose errors.
pub fn create_dir_all<P: AsRef<Path>>(path: P) -> IoResult<()> {
    std::fs::create_dir_all(&path).map_err(|error| IoError::at(&path, IoErrorType::File(error)))
}

/// Remove a directory tree if it exists, with verbose errors.
pub fn remove_dir_if_present<P: AsRef<Path>>(path: P) -> IoResult<()> {
    if !path.as_ref().exists() {
        return Ok(());
    }
    std::fs::remove_dir_all(&path).map_err(|error| IoError::at(&path, IoErrorType::File(error)))
}

/// Rename a file or directory with verbose errors.
pub fn rename<P: AsRef<Path>, Q: AsRef<Path>>(from: P, to: Q) -> IoResult<()> {
    std::fs::rename(&from, &to).map_err(|error| IoError::at(&from, IoErrorType::File(error)))
}

/// Copy a directory tree, with verbose errors.
pub fn copy_dir_all<P: AsRef<Path>, Q: AsRef<Path>>(from: P, to: Q) -> IoResult<()> {
    create_dir_all(&to)?;
    let entries = std::fs::read_dir(&from).map_err(|error| IoError::at(&from, IoErrorType::File(error)))?;
    for entry in entries {
        let entry = entry.map_err(|error| IoError::at(&from, IoErrorType::File(error)))?;
        let target = to.as_ref().join(entry.file_name());
        if entry.path().is_dir() {
            copy_dir_all(entry.path(), &target)?;
        } else {
            std::fs::copy(entry.path(), &target).map_err(|error| IoError::at(entry.path(), IoErrorType::File(error)))?;
        }
    }
    Ok(())
}

/// Mark a script as executable (no-op off unix).
pub fn make_executable<P: AsRef<Path>>(path: P) -> IoResult<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut permissions = std::fs::metadata(&path)
            .map_err(|error| IoError::at(&path, IoErrorType::File(error)))?
            .permissions();
        permissions.set_mode(0o755);
        std::fs::set_permissions(&path, permissions).map_err(|error| IoError::at(&path, IoErrorType::File(error)))?;
    }
    #[cfg(not(unix))]
    let _ = path;
    Ok(())
}

/// Read in cfg files from the supported filetypes.
pub fn read_cfg_file<T, P>(path: P) -> IoResult<T>
where
    T: serde::de::DeserializeOwned,
    P: AsRef<Path>,
{
    let extension = path.as_ref().extension().and_then(|e| e.to_str()).map(|e| e.to_ascii_lowercase());
    match extension.as_deref() {
        Some("json") => {
            serde_json::from_reader(std::io::BufReader::new(open(&path)?))
                .map_err(|error| IoError::at(&path, IoErrorType::SerdeJson(error)))
        },
        Some("toml") => {
            toml::from_str(&read_to_string(&path)?)
                .map_err(|error| IoError::at(&path, IoErrorType::TomlDe(error)))
        },
        Some("yaml") | Some("yml") => {
            serde_yaml::from_reader(open(&path)?)
                .map_err(|error| IoError::at(&path, IoErrorType::SerdeYaml(error)))
        },
        _ => {
            let supported_filetypes = vec!["json", "toml", "yaml", "yml"];
            let error_string = format!("Unsupported filetype for config file: {}\nSupported filetypes: {:?}", path.as_ref().display(), supported_filetypes);
            Err(IoError::at(&path, IoErrorType::StringOnly(error_string)))
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn reads_every_cfg_format() {
        let dir = std::env::temp_dir().join(format!("cfdcase_io_{}", std::process::id()));
        create_dir_all(&dir).unwrap();

        write_to_file(dir.join("a.yaml"), "speed: fast\n").unwrap();
        write_to_file(dir.join("a.json"), "{\"speed\": \"fast\"}").unwrap();
        write_to_file(dir.join("a.toml"), "speed = \"fast\"\n").unwrap();
        for name in ["a.yaml", "a.json", "a.toml"] {
            let cfg: BTreeMap<String, String> = read_cfg_file(dir.join(name)).unwrap();
            assert_eq!(cfg["speed"], "fast");
        }

        let error = read_cfg_file::<BTreeMap<String, String>, _>(dir.join("a.ini")).unwrap_err();
        assert!(matches!(error.cause, IoErrorType::StringOnly(_)));

        remove_dir_if_present(&dir).unwrap();
        assert!(!dir.exists());
    }
}
