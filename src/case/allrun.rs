//! The `Allrun` script that prepares the mesh and runs the solver.

use crate::boundary::BoundarySubtype;
use crate::case::context::CaseContext;
use crate::case::CaseFile;
use crate::physics::SolverApplication;

pub fn allrun(ctx: &CaseContext) -> CaseFile {
    let analysis = ctx.analysis;
    let mut lines = vec![
        "#!/bin/sh".to_string(),
        "cd \"${0%/*}\" || exit 1".to_string(),
        ". \"${WM_PROJECT_DIR:?}/bin/tools/RunFunctions\"".to_string(),
        String::new(),
        "application=$(getApplication)".to_string(),
        String::new(),
    ];
    if let Some(scale) = analysis.mesh.scale {
        if scale != 1.0 {
            lines.push(format!("runApplication transformPoints -scale \"({} {} {})\"", scale, scale, scale));
        }
    }
    if analysis.boundaries.iter().any(|boundary| boundary.subtype() == BoundarySubtype::PorousBaffle) {
        lines.push("runApplication createBaffles -overwrite".to_string());
    }
    let potential_app = ctx.application == SolverApplication::PotentialFoam;
    if analysis.initial.potential_flow && !potential_app {
        lines.push("runApplication potentialFoam -initialiseUBCs".to_string());
    }
    let solve = if potential_app { "$application -writep" } else { "$application" };
    if analysis.solver.cores > 1 {
        lines.push("runApplication decomposePar -force".to_string());
        lines.push(format!("runParallel {}", solve));
        lines.push("runApplication reconstructPar".to_string());
    } else {
        lines.push(format!("runApplication {}", solve));
    }
    lines.push(String::new());
    CaseFile::script("Allrun", &lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::Analysis;
    use crate::geo_3d::Geometry;

    #[test]
    fn parallel_run_with_potential_initialisation() {
        let mut analysis: Analysis = serde_yaml::from_str("name: run\n").unwrap();
        analysis.solver.cores = 2;
        analysis.initial.potential_flow = true;
        analysis.mesh.scale = Some(0.001);
        let geometry = Geometry::new();
        let ctx = CaseContext::new(&analysis, &geometry).unwrap();
        let script = allrun(&ctx);
        assert!(script.executable);
        let lines: Vec<&str> = script.content.lines().collect();
        let position = |line: &str| lines.iter().position(|l| *l == line).unwrap();
        assert!(position("runApplication transformPoints -scale \"(0.001 0.001 0.001)\"") < position("runApplication potentialFoam -initialiseUBCs"));
        assert!(position("runApplication decomposePar -force") < position("runParallel $application"));
        assert!(!script.content.contains("createBaffles"));
    }
}
