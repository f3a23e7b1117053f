use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use serde_json::json;
use std::path::PathBuf;
use tracing_subscriber::fmt::SubscriberBuilder;

use heliocurve::fitness::{DaylightEvaluator, EvalCfg};
use heliocurve::growth::{GrowthCfg, GrowthEngine, RepellerField};
use heliocurve::io::{read_factors, read_points, write_curve, write_light_grid};
use heliocurve::nsga::{Individual, Nsga2, NsgaCfg};
use heliocurve::shadow::ShadowRaster;
use heliocurve::solar::{sun_vectors, sunrise_sunset};
use heliocurve::Vec3;

mod provenance;

#[derive(Parser)]
#[command(name = "cli")]
#[command(about = "Curve growth and daylight optimization runner")]
struct Cmd {
    #[command(subcommand)]
    action: Action,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Season {
    Summer,
    Winter,
}

impl Season {
    fn name(self) -> &'static str {
        match self {
            Season::Summer => "summer",
            Season::Winter => "winter",
        }
    }
}

#[derive(Subcommand)]
enum Action {
    /// Grow the curve once and export it
    Grow {
        #[arg(long)]
        starting: PathBuf,
        #[arg(long)]
        repellers: Option<PathBuf>,
        #[arg(long)]
        factors: Option<PathBuf>,
        #[arg(long, default_value = "resultsCrv.csv")]
        out: PathBuf,
    },
    /// Grow, extrude uniformly, and rasterize one season onto the floor grid
    Lighting {
        #[arg(long)]
        starting: PathBuf,
        #[arg(long)]
        repellers: Option<PathBuf>,
        #[arg(long)]
        factors: Option<PathBuf>,
        /// Uniform extrusion depth applied to every vertex
        #[arg(long, default_value_t = 50.0)]
        extrusion: f64,
        #[arg(long, value_enum, default_value_t = Season::Summer)]
        season: Season,
        /// Output path; defaults to resultsLighting_<season>.csv
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Full two-objective optimization run
    Optimize {
        #[arg(long)]
        starting: PathBuf,
        #[arg(long)]
        repellers: Option<PathBuf>,
        #[arg(long, default_value = "out")]
        out_dir: PathBuf,
        #[arg(long, default_value_t = 50)]
        population: usize,
        #[arg(long, default_value_t = 100)]
        generations: usize,
        #[arg(long, default_value_t = 0)]
        seed: u64,
        /// Parallel evaluations per generation; 1 keeps runs bit-reproducible
        #[arg(long, default_value_t = 1)]
        jobs: usize,
    },
}

fn main() -> Result<()> {
    SubscriberBuilder::default().with_target(false).init();
    let cmd = Cmd::parse();
    match cmd.action {
        Action::Grow {
            starting,
            repellers,
            factors,
            out,
        } => grow(starting, repellers, factors, out),
        Action::Lighting {
            starting,
            repellers,
            factors,
            extrusion,
            season,
            out,
        } => lighting(starting, repellers, factors, extrusion, season, out),
        Action::Optimize {
            starting,
            repellers,
            out_dir,
            population,
            generations,
            seed,
            jobs,
        } => optimize(starting, repellers, out_dir, population, generations, seed, jobs),
    }
}

fn load_field(repellers: &Option<PathBuf>, factors: &Option<PathBuf>) -> Result<RepellerField> {
    let positions = match repellers {
        Some(path) => {
            read_points(path).with_context(|| format!("loading repellers {}", path.display()))?
        }
        None => Vec::new(),
    };
    let strengths = match factors {
        Some(path) => {
            read_factors(path).with_context(|| format!("loading factors {}", path.display()))?
        }
        None => Vec::new(),
    };
    Ok(RepellerField::new(positions, strengths))
}

fn grow_curve(
    starting: &PathBuf,
    repellers: &Option<PathBuf>,
    factors: &Option<PathBuf>,
) -> Result<Vec<Vec3>> {
    let start = read_points(starting)
        .with_context(|| format!("loading starting points {}", starting.display()))?;
    let field = load_field(repellers, factors)?;
    let mut engine = GrowthEngine::new(GrowthCfg::default(), field, start);
    engine.run();
    tracing::info!(points = engine.points().len(), "growth finished");
    Ok(engine.into_points())
}

fn grow(
    starting: PathBuf,
    repellers: Option<PathBuf>,
    factors: Option<PathBuf>,
    out: PathBuf,
) -> Result<()> {
    let curve = grow_curve(&starting, &repellers, &factors)?;
    write_curve(&out, &curve)?;
    provenance::write_sidecar(
        &out,
        provenance::Payload::new(json!({
            "starting": starting.to_string_lossy(),
            "points": curve.len(),
        })),
    )?;
    Ok(())
}

fn lighting(
    starting: PathBuf,
    repellers: Option<PathBuf>,
    factors: Option<PathBuf>,
    extrusion: f64,
    season: Season,
    out: Option<PathBuf>,
) -> Result<()> {
    let planar = grow_curve(&starting, &repellers, &factors)?;
    let vertical: Vec<Vec3> = planar.iter().map(|p| Vec3::new(p.x, 0.0, p.y)).collect();
    let extruded: Vec<Vec3> = vertical
        .iter()
        .map(|p| Vec3::new(p.x, p.y - extrusion, p.z))
        .collect();

    let cfg = EvalCfg::default();
    let window = match season {
        Season::Summer => cfg.summer,
        Season::Winter => cfg.winter,
    };
    if let Some((rise, set)) = sunrise_sunset(cfg.site, window.date) {
        tracing::info!(
            sunrise_min = rise,
            sunset_min = set,
            "daylight window for the sampled date"
        );
    }
    let suns = sun_vectors(cfg.site, window, cfg.up, cfg.north);
    let mut raster = ShadowRaster::new(
        vertical,
        extruded,
        cfg.room_w,
        cfg.room_h,
        cfg.cell_size,
        cfg.growth.closed,
    )?;
    raster.run_with_sun_vectors(&suns);
    tracing::info!(
        season = season.name(),
        samples = suns.len(),
        total = raster.total_hours(),
        average = raster.average_hours(),
        "lighting accumulated"
    );

    let out =
        out.unwrap_or_else(|| PathBuf::from(format!("resultsLighting_{}.csv", season.name())));
    write_light_grid(&out, raster.grid())?;
    provenance::write_sidecar(
        &out,
        provenance::Payload::new(json!({
            "season": season.name(),
            "extrusion": extrusion,
            "samples": suns.len(),
        })),
    )?;
    Ok(())
}

#[derive(Serialize)]
struct OptimizeParams {
    population: usize,
    generations: usize,
    seed: u64,
    jobs: usize,
    genome_len: usize,
}

fn optimize(
    starting: PathBuf,
    repellers: Option<PathBuf>,
    out_dir: PathBuf,
    population: usize,
    generations: usize,
    seed: u64,
    jobs: usize,
) -> Result<()> {
    let start = read_points(&starting)
        .with_context(|| format!("loading starting points {}", starting.display()))?;
    let repeller_points = match &repellers {
        Some(path) => {
            read_points(path).with_context(|| format!("loading repellers {}", path.display()))?
        }
        None => Vec::new(),
    };

    let evaluator = DaylightEvaluator::new(EvalCfg::default(), start, repeller_points);
    let (lower, upper) = evaluator.gene_bounds();
    let genome_len = lower.len();
    let mut cfg = NsgaCfg::new(lower, upper);
    cfg.population = population;
    cfg.generations = generations;
    cfg.seed = seed;
    cfg.workers = jobs;
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("creating output dir {}", out_dir.display()))?;
    cfg.log_dir = Some(out_dir.join("nsga_logs"));

    tracing::info!(population, generations, seed, jobs, "starting optimization");
    let mut driver = Nsga2::new(cfg, |genes: &[f64]| evaluator.objectives(genes))?;
    let pop = driver.run()?;

    let best = pop
        .iter()
        .min_by(|a, b| {
            a.objective_sum()
                .partial_cmp(&b.objective_sum())
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .context("optimizer returned an empty population")?;
    tracing::info!(
        front0 = pop.iter().filter(|p: &&Individual| p.rank == 0).count(),
        best_objectives = ?best.objectives,
        "optimization finished"
    );

    let (vertical, extruded) = evaluator.build_geometry(&best.genes);
    let curve_path = out_dir.join("resultsCrv.csv");
    write_curve(&curve_path, &vertical)?;

    for (name, suns) in [
        ("resultsLighting_summer.csv", evaluator.summer_suns()),
        ("resultsLighting_winter.csv", evaluator.winter_suns()),
    ] {
        let eval_cfg = evaluator.cfg();
        let mut raster = ShadowRaster::new(
            vertical.clone(),
            extruded.clone(),
            eval_cfg.room_w,
            eval_cfg.room_h,
            eval_cfg.cell_size,
            eval_cfg.growth.closed,
        )?;
        raster.run_with_sun_vectors(suns);
        write_light_grid(&out_dir.join(name), raster.grid())?;
    }

    provenance::write_sidecar(
        &curve_path,
        provenance::Payload::new(serde_json::to_value(OptimizeParams {
            population,
            generations,
            seed,
            jobs,
            genome_len,
        })?),
    )?;
    Ok(())
}
