//! Control files under `system/`.

use crate::boundary::BoundarySubtype;
use crate::case::context::CaseContext;
use crate::case::dictionary::{Dict, Value};
use crate::case::fields::baffle_patch_names;
use crate::case::CaseFile;
use crate::physics::{SolverApplication, TurbulenceQuantity, TurbulenceTier};

/// Every file under `system/`.
pub fn system_files(ctx: &CaseContext) -> Vec<CaseFile> {
    let mut files = vec![
        CaseFile::dict("system", "controlDict", "dictionary", &control_dict(ctx)),
        CaseFile::dict("system", "fvSchemes", "dictionary", &fv_schemes(ctx)),
        CaseFile::dict("system", "fvSolution", "dictionary", &fv_solution(ctx)),
    ];
    if ctx.analysis.solver.cores > 1 {
        let decompose = Dict::new()
            .with("numberOfSubdomains", Value::Number(ctx.analysis.solver.cores as f64))
            .with("method", Value::word("scotch"));
        files.push(CaseFile::dict("system", "decomposeParDict", "dictionary", &decompose));
    }
    if let Some(baffles) = create_baffles_dict(ctx) {
        files.push(CaseFile::dict("system", "createBafflesDict", "dictionary", &baffles));
    }
    files
}

/// Name of the pressure field the application solves for.
fn pressure_name(ctx: &CaseContext) -> &'static str {
    if ctx.application.solves_p_rgh() { "p_rgh" } else { "p" }
}

/// Energy variable of the application, if any.
fn energy_name(ctx: &CaseContext) -> Option<&'static str> {
    match ctx.application {
        SolverApplication::RhoCentralFoam => Some("e"),
        application if application.solves_energy() => Some("h"),
        _ => None,
    }
}

/// Transported turbulence fields (everything but `nut`).
fn turbulence_names(ctx: &CaseContext) -> Vec<String> {
    ctx.model.map_or(Vec::new(), |model| {
        model.solved_fields().iter()
            .filter(|quantity| **quantity != TurbulenceQuantity::Nut)
            .map(|quantity| quantity.to_string())
            .collect()
    })
}

/// Velocity, turbulence and energy: the fields solved with a smooth solver.
fn transported_names(ctx: &CaseContext) -> Vec<String> {
    let mut names = vec!["U".to_string()];
    names.extend(turbulence_names(ctx));
    names.extend(energy_name(ctx).map(str::to_string));
    names
}

fn quoted_group(names: &[String], suffix: &str) -> String {
    format!("\"({}){}\"", names.join("|"), suffix)
}

fn control_dict(ctx: &CaseContext) -> Dict {
    let solver = &ctx.analysis.solver;
    let steady = ctx.application.is_steady();
    let write_control = match (steady, solver.adjust_time_step) {
        (true, _) => "timeStep",
        (false, true) => "adjustableRunTime",
        (false, false) => "runTime",
    };
    let mut body = Dict::new()
        .with("application", Value::Word(ctx.application.to_string()))
        .with("startFrom", Value::word("latestTime"))
        .with("startTime", Value::Number(0.0))
        .with("stopAt", Value::word("endTime"))
        .with("endTime", Value::Number(solver.end_time))
        .with("deltaT", Value::Number(if steady { 1.0 } else { solver.time_step }))
        .with("writeControl", Value::word(write_control))
        .with("writeInterval", Value::Number(solver.write_interval))
        .with("purgeWrite", Value::Number(0.0))
        .with("writeFormat", Value::word("ascii"))
        .with("writePrecision", Value::Number(6.0))
        .with("writeCompression", Value::word("off"))
        .with("timeFormat", Value::word("general"))
        .with("timePrecision", Value::Number(6.0))
        .with("runTimeModifiable", Value::switch(true));
    if !steady {
        body.set("adjustTimeStep", Value::switch(solver.adjust_time_step));
        body.set("maxCo", Value::Number(solver.max_courant));
        if ctx.application == SolverApplication::InterFoam {
            body.set("maxAlphaCo", Value::Number(solver.max_courant));
        }
    }

    let mut residual_fields = vec![pressure_name(ctx).to_string()];
    residual_fields.extend(transported_names(ctx));
    let field_refs: Vec<&str> = residual_fields.iter().map(String::as_str).collect();
    let residuals = Dict::new()
        .with("type", Value::word("residuals"))
        .with("libs", Value::List(vec![Value::Str("libutilityFunctionObjects.so".to_string())]))
        .with("fields", Value::words(&field_refs))
        .with("writeControl", Value::word("timeStep"))
        .with("writeInterval", Value::Number(1.0));
    body.with_dict("functions", Dict::new().with_dict("residuals", residuals))
}

fn fv_schemes(ctx: &CaseContext) -> Dict {
    let application = ctx.application;
    let steady = application.is_steady();
    let bounded = |scheme: &str| Value::tokens(&if steady { format!("bounded {}", scheme) } else { scheme.to_string() });
    let tier = ctx.physics().turbulence_tier;
    let eddy_resolving = tier == TurbulenceTier::Les || tier == TurbulenceTier::Des;

    let mut div = Dict::new().with("default", Value::word("none"));
    let velocity_scheme = if eddy_resolving { "Gauss LUST grad(U)" } else { "Gauss linearUpwind grad(U)" };
    match application {
        SolverApplication::InterFoam => {
            div.set("div(rhoPhi,U)", Value::tokens(velocity_scheme));
            div.set("div(phi,alpha)", Value::tokens("Gauss vanLeer"));
            div.set("div(phirb,alpha)", Value::tokens("Gauss linear"));
        },
        SolverApplication::PotentialFoam => {
            div.set("div(div(phi,U))", Value::tokens("Gauss linear"));
        },
        SolverApplication::RhoCentralFoam => {
            div.set("div(tauMC)", Value::tokens("Gauss linear"));
        },
        _ => {
            div.set("div(phi,U)", bounded(velocity_scheme));
        },
    }
    let turbulence = turbulence_names(ctx);
    if !turbulence.is_empty() {
        div.set(&format!("\"div\\(phi,({})\\)\"", turbulence.join("|")), bounded("Gauss limitedLinear 1"));
    }
    if energy_name(ctx).is_some() && application != SolverApplication::RhoCentralFoam {
        div.set("\"div\\(phi,(h|K)\\)\"", bounded("Gauss upwind"));
        if application == SolverApplication::RhoSimpleFoam || application == SolverApplication::RhoPimpleFoam {
            div.set("div(phid,p)", bounded("Gauss upwind"));
        }
    }
    if application.uses_kinematic_pressure() {
        div.set("div((nuEff*dev2(T(grad(U)))))", Value::tokens("Gauss linear"));
    } else if application != SolverApplication::RhoCentralFoam {
        div.set("div(((rho*nuEff)*dev2(T(grad(U)))))", Value::tokens("Gauss linear"));
    }

    let mut body = Dict::new()
        .with_dict("ddtSchemes", Dict::new().with("default", Value::word(if steady { "steadyState" } else { "Euler" })))
        .with_dict("gradSchemes", Dict::new()
            .with("default", Value::tokens("Gauss linear"))
            .with("grad(U)", Value::tokens("cellLimited Gauss linear 1")))
        .with_dict("divSchemes", div)
        .with_dict("laplacianSchemes", Dict::new().with("default", Value::tokens("Gauss linear corrected")));

    let mut interpolation = Dict::new().with("default", Value::word("linear"));
    if application == SolverApplication::RhoCentralFoam {
        interpolation.set("reconstruct(rho)", Value::word("vanLeer"));
        interpolation.set("reconstruct(U)", Value::word("vanLeerV"));
        interpolation.set("reconstruct(T)", Value::word("vanLeer"));
    }
    body.set_dict("interpolationSchemes", interpolation);
    body.set_dict("snGradSchemes", Dict::new().with("default", Value::word("corrected")));
    if application == SolverApplication::RhoCentralFoam {
        body.set("fluxScheme", Value::word("Kurganov"));
    }
    if ctx.model.is_some() {
        body.set_dict("wallDist", Dict::new().with("method", Value::word("meshWave")));
    }
    body
}

fn smooth_solver(rel_tol: f64) -> Dict {
    Dict::new()
        .with("solver", Value::word("smoothSolver"))
        .with("smoother", Value::word("symGaussSeidel"))
        .with("tolerance", Value::Number(1e-8))
        .with("relTol", Value::Number(rel_tol))
}

fn gamg(rel_tol: f64) -> Dict {
    Dict::new()
        .with("solver", Value::word("GAMG"))
        .with("smoother", Value::word("GaussSeidel"))
        .with("tolerance", Value::Number(1e-6))
        .with("relTol", Value::Number(rel_tol))
}

fn fv_solution(ctx: &CaseContext) -> Dict {
    let application = ctx.application;
    let solver = &ctx.analysis.solver;
    let steady = application.is_steady();
    let pressure = pressure_name(ctx);
    let transported = transported_names(ctx);
    let potential = application == SolverApplication::PotentialFoam || ctx.analysis.initial.potential_flow;

    let mut solvers = Dict::new();
    if application == SolverApplication::RhoCentralFoam {
        solvers.set_dict("\"(rho|rhoU|rhoE)\"", Dict::new().with("solver", Value::word("diagonal")));
        solvers.set_dict(&quoted_group(&transported, ""), smooth_solver(0.01));
    } else {
        solvers.set_dict(pressure, gamg(if steady { 0.05 } else { 0.01 }));
        solvers.set_dict(&transported_key(&transported), smooth_solver(if steady { 0.1 } else { 0.0 }));
        if !steady {
            solvers.set_dict(&format!("{}Final", pressure), gamg(0.0));
            solvers.set_dict(&quoted_group(&transported, "Final"), smooth_solver(0.0));
        }
    }
    if let Some(phase) = ctx.analysis.phases().first() {
        solvers.set_dict(&format!("\"alpha.{}.*\"", phase), Dict::new()
            .with("nAlphaCorr", Value::Number(2.0))
            .with("nAlphaSubCycles", Value::Number(1.0))
            .with("cAlpha", Value::Number(1.0))
            .with("MULESCorr", Value::switch(true))
            .with("nLimiterIter", Value::Number(3.0))
            .with("solver", Value::word("smoothSolver"))
            .with("smoother", Value::word("symGaussSeidel"))
            .with("tolerance", Value::Number(1e-8))
            .with("relTol", Value::Number(0.0)));
        solvers.set_dict("\"pcorr.*\"", Dict::new()
            .with("solver", Value::word("PCG"))
            .with("preconditioner", Value::word("DIC"))
            .with("tolerance", Value::Number(1e-5))
            .with("relTol", Value::Number(0.0)));
    }
    if potential {
        solvers.set_dict("Phi", gamg(0.01));
    }

    let mut body = Dict::new().with_dict("solvers", solvers);
    if potential {
        body.set_dict("potentialFlow", Dict::new().with("nNonOrthogonalCorrectors", Value::Number(3.0)));
    }
    if application == SolverApplication::PotentialFoam || application == SolverApplication::RhoCentralFoam {
        return body;
    }

    if steady {
        let tolerance = Value::Number(solver.convergence_tolerance);
        let mut residual_control = Dict::new().with(pressure, tolerance.clone());
        for name in transported.iter() {
            residual_control.set(name, tolerance.clone());
        }
        let mut simple = Dict::new()
            .with("nNonOrthogonalCorrectors", Value::Number(0.0))
            .with("consistent", Value::switch(false));
        if application == SolverApplication::RhoSimpleFoam {
            simple.set("transonic", Value::switch(false));
        }
        body.set_dict("SIMPLE", simple.with_dict("residualControl", residual_control));

        let pressure_relaxation = if application.solves_p_rgh() { 0.7 } else { 0.3 };
        body.set_dict("relaxationFactors", Dict::new()
            .with_dict("fields", Dict::new().with(pressure, Value::Number(pressure_relaxation)))
            .with_dict("equations", Dict::new()
                .with("U", Value::Number(0.7))
                .with("\".*\"", Value::Number(0.7))));
    } else {
        body.set_dict("PIMPLE", Dict::new()
            .with("momentumPredictor", Value::switch(application != SolverApplication::InterFoam))
            .with("nOuterCorrectors", Value::Number(solver.outer_correctors as f64))
            .with("nCorrectors", Value::Number(2.0))
            .with("nNonOrthogonalCorrectors", Value::Number(0.0)));
        body.set_dict("relaxationFactors", Dict::new()
            .with_dict("equations", Dict::new().with("\".*\"", Value::Number(1.0))));
    }
    body
}

/// Plain key for a single field, a quoted group otherwise.
fn transported_key(names: &[String]) -> String {
    match names {
        [name] => name.clone(),
        _ => quoted_group(names, ""),
    }
}

/// Baffle creation from the face zones named after porous baffles.
fn create_baffles_dict(ctx: &CaseContext) -> Option<Dict> {
    let mut baffles = Dict::new();
    for boundary in ctx.analysis.boundaries.iter().filter(|b| b.subtype() == BoundarySubtype::PorousBaffle) {
        let [master, slave] = baffle_patch_names(&boundary.name);
        let side = |name: &str, neighbour: &str| Dict::new()
            .with("name", Value::word(name))
            .with("type", Value::word("cyclic"))
            .with("neighbourPatch", Value::word(neighbour));
        baffles.set_dict(&boundary.name, Dict::new()
            .with("type", Value::word("faceZone"))
            .with("zoneName", Value::Word(boundary.name.clone()))
            .with_dict("patches", Dict::new()
                .with_dict("master", side(&master, &slave))
                .with_dict("slave", side(&slave, &master))));
    }
    if baffles.is_empty() {
        return None;
    }
    Some(Dict::new()
        .with("internalFacesOnly", Value::switch(true))
        .with_dict("baffles", baffles))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::Analysis;
    use crate::geo_3d::Geometry;
    use crate::physics::{TimeScheme, TurbulenceModel};

    fn files_for(analysis: &Analysis) -> Vec<CaseFile> {
        let geometry = Geometry::new();
        let ctx = CaseContext::new(analysis, &geometry).unwrap();
        system_files(&ctx)
    }

    fn parsed(files: &[CaseFile], name: &str) -> Dict {
        files.iter().find(|file| file.path.ends_with(name)).unwrap().parse().unwrap()
    }

    #[test]
    fn steady_rans_is_bounded_simple() {
        let analysis: Analysis = serde_yaml::from_str("name: steady\n").unwrap();
        let files = files_for(&analysis);
        assert_eq!(files.len(), 3);

        let control = parsed(&files, "controlDict");
        assert_eq!(control.get_value("application"), Some(&Value::word("simpleFoam")));
        assert_eq!(control.get_value("deltaT"), Some(&Value::Number(1.0)));

        let schemes = parsed(&files, "fvSchemes");
        assert_eq!(schemes.lookup_value("ddtSchemes/default"), Some(&Value::word("steadyState")));
        assert_eq!(schemes.lookup_value("divSchemes/div(phi,U)"), Some(&Value::tokens("bounded Gauss linearUpwind grad(U)")));
        assert!(schemes.lookup_value("divSchemes/\"div\\(phi,(k|omega)\\)\"").is_some());

        let solution = parsed(&files, "fvSolution");
        assert!(solution.lookup("SIMPLE/residualControl/omega").is_some());
        assert!(solution.lookup("solvers/\"(U|k|omega)\"").is_some());
        assert!(solution.get("PIMPLE").is_none());
    }

    #[test]
    fn transient_les_uses_lust_and_pimple() {
        let mut analysis: Analysis = serde_yaml::from_str("name: les\n").unwrap();
        analysis.physics.time = TimeScheme::Transient;
        analysis.physics.turbulence_tier = TurbulenceTier::Les;
        analysis.physics.turbulence_model = Some(TurbulenceModel::Smagorinsky);
        analysis.solver.cores = 4;
        let files = files_for(&analysis);

        let schemes = parsed(&files, "fvSchemes");
        assert_eq!(schemes.lookup_value("ddtSchemes/default"), Some(&Value::word("Euler")));
        assert_eq!(schemes.lookup_value("divSchemes/div(phi,U)"), Some(&Value::tokens("Gauss LUST grad(U)")));

        let solution = parsed(&files, "fvSolution");
        assert_eq!(solution.lookup_value("PIMPLE/nOuterCorrectors"), Some(&Value::Number(1.0)));
        assert!(solution.lookup("solvers/U").is_some());
        assert!(solution.lookup("solvers/\"(U)Final\"").is_some());

        let decompose = parsed(&files, "decomposeParDict");
        assert_eq!(decompose.get_value("numberOfSubdomains"), Some(&Value::Number(4.0)));
    }
}
