use clap::{Parser, Subcommand};
use rb_app::{
    AppError, AppResult, PointResult, RunOptions, RunResults, RunStore, compute_run_id,
    project_service, run_service,
};
use rb_solver::SolverKind;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser)]
#[command(name = "rotorbem")]
#[command(about = "Rotor performance by blade element momentum theory", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate project file syntax, references and geometry
    Validate {
        /// Path to the project YAML or JSON file
        project_path: PathBuf,
    },
    /// List rotors and airfoils in a project
    Rotors {
        /// Path to the project YAML or JSON file
        project_path: PathBuf,
    },
    /// Solve every operating point of a project
    Run {
        /// Path to the project YAML or JSON file
        project_path: PathBuf,
        /// Also write the results here (.json, .yaml or .yml)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Keep per-element distributions in the results
        #[arg(long)]
        elements: bool,
        /// Skip cache and force re-run
        #[arg(long)]
        no_cache: bool,
    },
    /// List cached runs for a project
    Runs {
        /// Path to the project YAML or JSON file
        project_path: PathBuf,
    },
    /// List the available BEMT solvers
    Solvers,
}

fn main() -> AppResult<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { project_path } => cmd_validate(&project_path),
        Commands::Rotors { project_path } => cmd_rotors(&project_path),
        Commands::Run {
            project_path,
            output,
            elements,
            no_cache,
        } => cmd_run(&project_path, output.as_deref(), elements, !no_cache),
        Commands::Runs { project_path } => cmd_runs(&project_path),
        Commands::Solvers => cmd_solvers(),
    }
}

fn cmd_validate(project_path: &Path) -> AppResult<()> {
    println!("Validating project: {}", project_path.display());
    let project = project_service::load_project(project_path)?;
    project_service::validate_project(&project)?;
    println!(
        "✓ Project is valid ({} rotors, {} operating points)",
        project.rotors.len(),
        project.operation.n_points()
    );
    Ok(())
}

fn cmd_rotors(project_path: &Path) -> AppResult<()> {
    let project = project_service::load_project(project_path)?;
    println!("Rotors in project (upstream first):");
    for r in project_service::list_rotors(&project) {
        println!(
            "  {} - {} ({} blades, R = {:.3} m, cutout {:.3} m, {} elements, x = {:.3} m)",
            r.id, r.name, r.n_blades, r.radius_m, r.root_cutout_m, r.n_elements, r.position_m
        );
    }
    println!("Airfoils:");
    for (id, kind) in project_service::list_airfoils(&project) {
        println!("  {id} ({kind})");
    }
    Ok(())
}

fn cmd_run(
    project_path: &Path,
    output: Option<&Path>,
    elements: bool,
    use_cache: bool,
) -> AppResult<()> {
    let project = project_service::load_project(project_path)?;
    let store = RunStore::for_project(project_path)?;
    let run_id = compute_run_id(&project, run_service::SOLVER_VERSION);

    // Cached runs only hold element data when the project asked for it
    let results = if use_cache && !elements && store.has_run(&run_id) {
        println!("✓ Loaded from cache: {run_id}");
        store.load_results(&run_id)?
    } else {
        println!(
            "Running {} operating points of '{}'",
            project.operation.n_points(),
            project.name
        );
        let results = run_service::run_project(&project, RunOptions { elements })?;
        let run_dir = store.save_run(&results)?;
        for path in run_service::write_diagnostics(&run_dir, &results)? {
            println!("  residual curve written to {}", path.display());
        }
        println!("✓ Run completed: {run_id}");
        results
    };

    if let Some(path) = output {
        run_service::write_results(path, &results)?;
        info!(path = %path.display(), "results written");
        println!("  Results written to {}", path.display());
    }

    print_summary(&results);

    let failed = results.manifest.n_failed;
    if failed > 0 {
        return Err(AppError::Solver(format!(
            "{failed} of {} operating points failed",
            results.manifest.n_points
        )));
    }
    Ok(())
}

fn print_summary(results: &RunResults) {
    println!(
        "  Solver: {} (loss: {}), {} points",
        results.manifest.solver, results.manifest.loss, results.manifest.n_points
    );
    println!(
        "  {:>5} {:>8} {:>8} {:>8} {:>7}  {:<10} {:>11} {:>11} {:>11} {:>8}",
        "#", "alt[m]", "V[m/s]", "rpm", "θ[deg]", "rotor", "T[N]", "Q[N·m]", "P[W]", "cT"
    );
    for p in &results.points {
        print_point(p);
    }
}

fn print_point(p: &PointResult) {
    let head = format!(
        "  {:>5} {:>8.1} {:>8.2} {:>8.1} {:>7.2}",
        p.index, p.altitude_m, p.speed_mps, p.rpm, p.collective_deg
    );
    if let Some(err) = &p.error {
        println!("{head}  FAILED: {err}");
        return;
    }
    for r in &p.rotors {
        let ct = r.ct.map(|v| format!("{v:.5}")).unwrap_or_else(|| "-".to_string());
        let flag = if r.converged { "" } else { " (not converged)" };
        println!(
            "{head}  {:<10} {:>11.3} {:>11.3} {:>11.2} {:>8}{flag}",
            r.rotor_id, r.thrust_n, r.torque_nm, r.power_w, ct
        );
    }
}

fn cmd_runs(project_path: &Path) -> AppResult<()> {
    let project = project_service::load_project(project_path)?;
    let store = RunStore::for_project(project_path)?;
    let runs = store.list_runs(&project.name)?;
    if runs.is_empty() {
        println!("No cached runs for '{}'", project.name);
        return Ok(());
    }
    println!("Cached runs for '{}':", project.name);
    for m in runs {
        println!(
            "  {}  {}  {} ({} points, {} failed)",
            &m.run_id[..12.min(m.run_id.len())],
            m.timestamp,
            m.solver,
            m.n_points,
            m.n_failed
        );
    }
    Ok(())
}

fn cmd_solvers() -> AppResult<()> {
    println!("Available solvers:");
    for kind in SolverKind::ALL {
        println!("  {:<10} {}", kind.name(), kind.description());
    }
    Ok(())
}
