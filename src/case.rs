//! Case directory serializer.
//!
//! An analysis is rendered to text in memory first, then written to a sibling
//! staging directory `<case>.tmp` that replaces the case directory only once
//! every file is in place. A failed write leaves a previous case untouched
//! and can simply be retried.

mod proc_errors;
mod context;
mod dictionary;
mod fields;
mod constant;
mod system;
mod allrun;

use std::path::{Path, PathBuf};

use crate::analysis::Analysis;
use crate::geo_3d::Geometry;
use crate::io;
use crate::physics::SolverApplication;

pub use proc_errors::{
    CaseError,
    ProcResult,
    err_str,
};
pub use context::CaseContext;
pub use dictionary::{
    Dict,
    Entry,
    Value,
    FoamHeader,
    ParseError,
    parse_foam,
};
pub use fields::{
    FieldWriter,
    FieldChoice,
    PressureRole,
    case_fields,
    field_dict,
    baffle_patch_names,
};

/// One rendered file of a case.
#[derive(Debug, Clone, PartialEq)]
pub struct CaseFile {
    /// Path relative to the case directory.
    pub path: PathBuf,
    pub content: String,
    pub executable: bool,
}
impl CaseFile {
    /// A dictionary file with its `FoamFile` header.
    pub fn dict(location: &str, object: &str, class: &str, body: &Dict) -> Self {
        CaseFile{
            path: Path::new(location).join(object),
            content: FoamHeader::new(class, location, object).render(body),
            executable: false,
        }
    }

    /// An executable script at the case root.
    pub fn script(name: &str, content: &str) -> Self {
        CaseFile{path: PathBuf::from(name), content: content.to_string(), executable: true}
    }

    /// Parse a dictionary file back.
    pub fn parse(&self) -> ProcResult<Dict> {
        Ok(parse_foam(&self.content)?)
    }
}

/// What a successful write produced.
#[derive(Debug, Clone, PartialEq)]
pub struct CaseSummary {
    pub case_dir: PathBuf,
    pub application: SolverApplication,
    /// Written files, relative to the case directory.
    pub files: Vec<PathBuf>,
}

/// Validate the analysis and render every case file, without touching the disk.
pub fn render_case(analysis: &Analysis, geometry: &Geometry) -> ProcResult<(SolverApplication, Vec<CaseFile>)> {
    let errors = analysis.validate(geometry);
    if !errors.is_empty() {
        return Err(CaseError::Invalid(errors));
    }
    let ctx = CaseContext::new(analysis, geometry)?;
    let mut files = Vec::new();
    for field in case_fields(&ctx) {
        let body = field_dict(&field, &ctx)?;
        files.push(CaseFile::dict("0", &field.name(), field.class(), &body));
    }
    files.extend(constant::constant_files(&ctx)?);
    files.extend(system::system_files(&ctx));
    files.push(allrun::allrun(&ctx));
    Ok((ctx.application, files))
}

/// Sibling of a directory with an extra extension, e.g. `case.tmp`.
fn sibling(dir: &Path, extension: &str) -> ProcResult<PathBuf> {
    match dir.file_name() {
        Some(name) => Ok(dir.with_file_name(format!("{}.{}", name.to_string_lossy(), extension))),
        None => err_str(&format!("Case directory {} must end in a directory name", dir.display())),
    }
}

/// Copy `constant/polyMesh` from the configured mesh directory.
fn copy_mesh(analysis: &Analysis, mesh_dir: &str, staging: &Path) -> ProcResult<()> {
    let source = analysis.resolve_path(mesh_dir);
    let source = if source.join("polyMesh").is_dir() { source.join("polyMesh") } else { source };
    if !source.join("points").exists() && !source.join("points.gz").exists() {
        return err_str(&format!("No mesh found in {}: expected a polyMesh directory with a points file", source.display()));
    }
    io::copy_dir_all(&source, staging.join("constant").join("polyMesh"))?;
    Ok(())
}

/// Swap the staging directory in place of the target.
fn replace_dir(staging: &Path, target: &Path) -> ProcResult<()> {
    if !target.exists() {
        io::rename(staging, target)?;
        return Ok(());
    }
    let old = sibling(target, "old")?;
    io::remove_dir_if_present(&old)?;
    io::rename(target, &old)?;
    if let Err(error) = io::rename(staging, target) {
        io::rename(&old, target)?;
        return Err(error.into());
    }
    io::remove_dir_if_present(&old)?;
    Ok(())
}

/// Write the case directory for an analysis.
pub fn write_case<P: AsRef<Path>>(analysis: &Analysis, geometry: &Geometry, case_dir: P, quiet: bool) -> ProcResult<CaseSummary> {
    let case_dir = case_dir.as_ref();
    let (application, files) = render_case(analysis, geometry)?;

    let staging = sibling(case_dir, "tmp")?;
    io::remove_dir_if_present(&staging)?;
    for sub_dir in ["0", "constant", "system"] {
        io::create_dir_all(staging.join(sub_dir))?;
    }
    if let Some(mesh_dir) = &analysis.mesh.mesh_dir {
        if !quiet {
            println!("Copying mesh from {}...", mesh_dir);
        }
        copy_mesh(analysis, mesh_dir, &staging)?;
    }
    for file in files.iter() {
        if !quiet {
            println!("Writing {}...", file.path.display());
        }
        let path = staging.join(&file.path);
        io::write_to_file(&path, &file.content)?;
        if file.executable {
            io::make_executable(&path)?;
        }
    }
    replace_dir(&staging, case_dir)?;
    if !quiet {
        println!("{} case written to {}", application, case_dir.display());
    }

    Ok(CaseSummary{
        case_dir: case_dir.to_path_buf(),
        application,
        files: files.into_iter().map(|file| file.path).collect(),
    })
}

/// Read and parse one dictionary file of a case.
pub fn read_foam_file<P: AsRef<Path>>(path: P) -> ProcResult<Dict> {
    Ok(parse_foam(&io::read_to_string(path)?)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn staging_sits_next_to_the_case() {
        assert_eq!(sibling(Path::new("runs/duct"), "tmp").unwrap(), PathBuf::from("runs/duct.tmp"));
        assert_eq!(sibling(Path::new("duct/"), "old").unwrap(), PathBuf::from("duct.old"));
        assert!(sibling(Path::new("/"), "tmp").is_err());
    }

    #[test]
    fn invalid_analysis_renders_nothing() {
        let analysis: Analysis = serde_yaml::from_str("name: empty\n").unwrap();
        match render_case(&analysis, &Geometry::new()) {
            Err(CaseError::Invalid(errors)) => assert!(crate::validation::names_field(&errors, "Boundaries")),
            other => panic!("expected a validation error, got {:?}", other.map(|(app, _)| app)),
        }
    }
}
