//! Property files under `constant/`.

use crate::case::context::CaseContext;
use crate::case::dictionary::{Dict, Value};
use crate::case::{CaseFile, ProcResult, err_str};
use crate::material::MaterialSi;
use crate::physics::{SolverApplication, TurbulenceTier};

const KINEMATIC_VISCOSITY: [i32; 7] = [0, 2, -1, 0, 0, 0, 0];
const DENSITY: [i32; 7] = [1, -3, 0, 0, 0, 0, 0];
const SURFACE_TENSION: [i32; 7] = [1, 0, -2, 0, 0, 0, 0];
const ACCELERATION: [i32; 7] = [0, 1, -2, 0, 0, 0, 0];

fn dimensioned(dims: [i32; 7], value: f64) -> Value {
    Value::Dimensioned(dims, Box::new(Value::Number(value)))
}

/// Every file under `constant/` the application reads.
pub fn constant_files(ctx: &CaseContext) -> ProcResult<Vec<CaseFile>> {
    let mut files = Vec::new();
    if let Some(body) = transport_properties(ctx)? {
        files.push(CaseFile::dict("constant", "transportProperties", "dictionary", &body));
    }
    if ctx.application.solves_energy() {
        files.push(CaseFile::dict("constant", "thermophysicalProperties", "dictionary", &thermophysical_properties(ctx)?));
    }
    let momentum = momentum_transport(ctx);
    // Older releases read the same dictionary under its former name
    files.push(CaseFile::dict("constant", "momentumTransport", "dictionary", &momentum));
    files.push(CaseFile::dict("constant", "turbulenceProperties", "dictionary", &momentum));
    if ctx.application.solves_p_rgh() {
        let gravity = Dict::new()
            .with("dimensions", Value::Dimensions(ACCELERATION))
            .with("value", Value::Vector(ctx.physics().gravity));
        files.push(CaseFile::dict("constant", "g", "uniformDimensionedVectorField", &gravity));
    }
    Ok(files)
}

fn newtonian(material: &MaterialSi) -> Dict {
    Dict::new()
        .with("transportModel", Value::word("Newtonian"))
        .with("nu", dimensioned(KINEMATIC_VISCOSITY, material.kinematic_viscosity))
}

fn transport_properties(ctx: &CaseContext) -> ProcResult<Option<Dict>> {
    if ctx.application == SolverApplication::InterFoam {
        let names: Vec<&str> = ctx.materials.iter().map(|material| material.name.as_str()).collect();
        let mut body = Dict::new().with("phases", Value::words(&names));
        for material in ctx.materials.iter() {
            body.set_dict(&material.name, newtonian(material)
                .with("rho", dimensioned(DENSITY, material.density)));
        }
        let sigma = match ctx.fluid().surface_tension {
            Some(sigma) => sigma,
            None => return err_str(&format!("Material '{}' needs a surface tension for free-surface flow", ctx.fluid().name)),
        };
        body.set("sigma", dimensioned(SURFACE_TENSION, sigma));
        return Ok(Some(body));
    }
    if ctx.application.uses_kinematic_pressure() {
        return Ok(Some(newtonian(ctx.fluid())));
    }
    Ok(None)
}

fn thermophysical_properties(ctx: &CaseContext) -> ProcResult<Dict> {
    let fluid = ctx.fluid();
    let specific_heat = match fluid.specific_heat {
        Some(cp) => cp,
        None => return err_str(&format!("Material '{}' needs a specific heat when energy is solved", fluid.name)),
    };
    let buoyant = ctx.application.solves_p_rgh();
    let boussinesq = buoyant && fluid.expansion_coefficient.is_some();
    let sutherland = if buoyant { None } else { fluid.sutherland };

    let energy = if ctx.application == SolverApplication::RhoCentralFoam { "sensibleInternalEnergy" } else { "sensibleEnthalpy" };
    let thermo_type = Dict::new()
        .with("type", Value::word(if buoyant { "heRhoThermo" } else { "hePsiThermo" }))
        .with("mixture", Value::word("pureMixture"))
        .with("transport", Value::word(if sutherland.is_some() { "sutherland" } else { "const" }))
        .with("thermo", Value::word("hConst"))
        .with("equationOfState", Value::word(if boussinesq { "Boussinesq" } else { "perfectGas" }))
        .with("specie", Value::word("specie"))
        .with("energy", Value::word(energy));

    let transport = match sutherland {
        Some((a_s, t_s)) => Dict::new()
            .with("As", Value::Number(a_s))
            .with("Ts", Value::Number(t_s)),
        None => {
            let prandtl = match fluid.prandtl {
                Some(prandtl) => prandtl,
                None => return err_str(&format!("Material '{}' needs a Prandtl number when energy is solved", fluid.name)),
            };
            Dict::new()
                .with("mu", Value::Number(fluid.dynamic_viscosity))
                .with("Pr", Value::Number(prandtl))
        },
    };

    let mut mixture = Dict::new()
        .with_dict("specie", Dict::new().with("molWeight", Value::Number(fluid.molar_mass * 1000.0)))
        .with_dict("thermodynamics", Dict::new()
            .with("Cp", Value::Number(specific_heat))
            .with("Hf", Value::Number(0.0)))
        .with_dict("transport", transport);
    if let (true, Some(beta)) = (boussinesq, fluid.expansion_coefficient) {
        mixture.set_dict("equationOfState", Dict::new()
            .with("rho0", Value::Number(fluid.density))
            .with("T0", Value::Number(ctx.temperature))
            .with("beta", Value::Number(beta)));
    }

    Ok(Dict::new()
        .with_dict("thermoType", thermo_type)
        .with_dict("mixture", mixture))
}

fn momentum_transport(ctx: &CaseContext) -> Dict {
    let tier = ctx.physics().turbulence_tier;
    let body = Dict::new().with("simulationType", Value::word(tier.simulation_type()));
    let model = match ctx.model {
        Some(model) => model,
        None => return body,
    };
    let mut coeffs = Dict::new()
        .with("model", Value::Word(model.to_string()))
        .with("turbulence", Value::word("on"))
        .with("printCoeffs", Value::word("on"));
    if tier == TurbulenceTier::Rans {
        return body.with_dict("RAS", coeffs);
    }
    coeffs.set("delta", Value::word("cubeRootVol"));
    coeffs.set_dict("cubeRootVolCoeffs", Dict::new().with("deltaCoeff", Value::Number(1.0)));
    body.with_dict("LES", coeffs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::Analysis;
    use crate::geo_3d::Geometry;
    use crate::material::FluidMaterial;
    use crate::physics::{FlowRegime, PhaseMode, ThermalMode, TimeScheme};

    fn analysis() -> Analysis {
        serde_yaml::from_str("name: props\n").unwrap()
    }

    fn file<'a>(files: &'a [CaseFile], name: &str) -> Option<&'a CaseFile> {
        files.iter().find(|file| file.path.ends_with(name))
    }

    #[test]
    fn incompressible_writes_kinematic_viscosity() {
        let analysis = analysis();
        let geometry = Geometry::new();
        let ctx = CaseContext::new(&analysis, &geometry).unwrap();
        let files = constant_files(&ctx).unwrap();
        let transport = file(&files, "transportProperties").unwrap().parse().unwrap();
        match transport.get_value("nu") {
            Some(Value::Dimensioned(dims, nu)) => {
                assert_eq!(*dims, KINEMATIC_VISCOSITY);
                assert!((nu.as_number().unwrap() - 1.8e-5 / 1.2).abs() < 1e-12);
            },
            other => panic!("unexpected nu entry {:?}", other),
        }
        assert!(file(&files, "thermophysicalProperties").is_none());
        assert!(file(&files, "g").is_none());
        let momentum = file(&files, "momentumTransport").unwrap().parse().unwrap();
        assert_eq!(momentum.lookup_value("RAS/model"), Some(&Value::word("kOmegaSST")));
    }

    #[test]
    fn compressible_uses_sutherland() {
        let mut analysis = analysis();
        analysis.physics.flow = FlowRegime::Compressible;
        let geometry = Geometry::new();
        let ctx = CaseContext::new(&analysis, &geometry).unwrap();
        let files = constant_files(&ctx).unwrap();
        assert!(file(&files, "transportProperties").is_none());
        let thermo = file(&files, "thermophysicalProperties").unwrap().parse().unwrap();
        assert_eq!(thermo.lookup_value("thermoType/transport"), Some(&Value::word("sutherland")));
        assert_eq!(thermo.lookup_value("mixture/transport/Ts"), Some(&Value::Number(110.4)));
        assert!((thermo.lookup_value("mixture/specie/molWeight").unwrap().as_number().unwrap() - 28.9).abs() < 1e-9);
    }

    #[test]
    fn buoyant_water_is_boussinesq() {
        let mut analysis = analysis();
        analysis.physics.thermal = ThermalMode::Energy;
        analysis.materials = vec![FluidMaterial::preset("water").unwrap()];
        let geometry = Geometry::new();
        let ctx = CaseContext::new(&analysis, &geometry).unwrap();
        let files = constant_files(&ctx).unwrap();
        let thermo = file(&files, "thermophysicalProperties").unwrap().parse().unwrap();
        assert_eq!(thermo.lookup_value("thermoType/equationOfState"), Some(&Value::word("Boussinesq")));
        assert_eq!(thermo.lookup_value("mixture/equationOfState/rho0"), Some(&Value::Number(998.0)));
        assert!(file(&files, "g").unwrap().content.contains("(0 -9.81 0)"));
    }

    #[test]
    fn free_surface_lists_both_phases() {
        let mut analysis = analysis();
        analysis.physics.phase = PhaseMode::FreeSurface;
        analysis.physics.time = TimeScheme::Transient;
        analysis.materials = vec![FluidMaterial::preset("water").unwrap(), FluidMaterial::preset("air").unwrap()];
        let geometry = Geometry::new();
        let ctx = CaseContext::new(&analysis, &geometry).unwrap();
        let files = constant_files(&ctx).unwrap();
        let transport = file(&files, "transportProperties").unwrap().parse().unwrap();
        assert_eq!(transport.get_value("phases"), Some(&Value::words(&["water", "air"])));
        assert!(transport.get_dict("air").is_some());
        assert!(matches!(transport.get_value("sigma"), Some(Value::Dimensioned(SURFACE_TENSION, _))));
    }
}
