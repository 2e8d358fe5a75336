use std::path::PathBuf;

use clap::{Args, Parser};

use contour_trimmer::{generators, options::StylePolicy, Contour, TrimOptions, Trimmer};

#[derive(Copy, Clone, Debug, clap::ValueEnum)]
enum Example {
    Checkerboard,
    SlantedCheckerboard,
    Circles,
}

#[derive(Parser)]
struct Cli {
    #[arg(long)]
    output: PathBuf,

    #[command(flatten)]
    input: Input,

    /// A YAML file with trimming options.
    #[arg(long)]
    options: Option<PathBuf>,

    #[arg(long)]
    decimals: Option<u32>,

    #[arg(long)]
    flatness: Option<f64>,

    /// Draw every output chain with the same plain style.
    #[arg(long)]
    plain: bool,
}

#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
struct Input {
    /// A text file with one path per line, written as SVG path data.
    input: Option<PathBuf>,

    #[arg(long)]
    example: Option<Example>,
}

fn get_contours(input: &Input) -> anyhow::Result<Vec<Contour>> {
    match (&input.input, &input.example) {
        (Some(path), None) => {
            let input = std::fs::read_to_string(path)?;
            let contours = input
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty() && !line.starts_with('#'))
                .enumerate()
                .map(|(i, line)| Contour::from_svg(format!("path{i}"), line))
                .collect::<Result<_, _>>()?;
            Ok(contours)
        }
        (None, Some(example)) => Ok(match example {
            Example::Checkerboard => generators::checkerboard(10),
            Example::SlantedCheckerboard => generators::slanted_checkerboard(10),
            Example::Circles => generators::circles(10),
        }),
        _ => unreachable!(),
    }
}

pub fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Cli::parse();
    let contours = get_contours(&args.input)?;

    let mut options: TrimOptions = match &args.options {
        Some(path) => serde_yaml::from_str(&std::fs::read_to_string(path)?)?,
        None => TrimOptions::default(),
    };
    if let Some(decimals) = args.decimals {
        options.decimals = decimals;
    }
    if let Some(flatness) = args.flatness {
        options.flatness = flatness;
    }
    if args.plain {
        options.style = StylePolicy::trimmed();
    }

    let out = Trimmer::new(options)?.run(&contours)?;
    for report in out.reports.iter().filter(|r| r.is_self_intersecting()) {
        tracing::info!(
            id = %report.id,
            points = report.self_intersections.len(),
            "self-intersecting contour"
        );
    }
    eprintln!(
        "{} contours, {} intersections, {} chains",
        out.reports.len(),
        out.intersections.len(),
        out.chains.len()
    );

    svg::save(&args.output, &contour_trimmer::svg::render(&out))?;
    Ok(())
}
