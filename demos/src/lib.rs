//! Driver shared by the `anyangle` binary: pick a scenario and a search, run
//! it, and format the result with an ASCII picture of the path.

use std::fmt;
use std::str::FromStr;

use anyangle_core::Point;
use anyangle_maps::{MapError, Scenario, render, scenarios};
use anyangle_paths::{RelaxationStrategy, SearchEngine, SearchOutcome, SearchStats};
use log::info;
use thiserror::Error;

pub const DEFAULT_SCENARIO: &str = "wall";

/// Which search to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Algorithm {
    Theta,
    #[default]
    Strict,
    Subgoal,
}

impl Algorithm {
    pub const ALL: [Algorithm; 3] = [Algorithm::Theta, Algorithm::Strict, Algorithm::Subgoal];

    pub fn name(self) -> &'static str {
        match self {
            Algorithm::Theta => "theta",
            Algorithm::Strict => "strict",
            Algorithm::Subgoal => "subgoal",
        }
    }
}

impl FromStr for Algorithm {
    type Err = DemoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "theta" | "theta*" => Ok(Algorithm::Theta),
            "strict" | "strict-theta" | "strict-theta*" => Ok(Algorithm::Strict),
            "subgoal" | "sg" => Ok(Algorithm::Subgoal),
            _ => Err(DemoError::UnknownAlgorithm(s.to_string())),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Error)]
pub enum DemoError {
    #[error("unknown scenario {0:?}, try `list`")]
    UnknownScenario(String),
    #[error("unknown algorithm {0:?}, expected theta, strict or subgoal")]
    UnknownAlgorithm(String),
    #[error("unexpected argument {0:?}")]
    UnexpectedArgument(String),
    #[error(transparent)]
    Map(#[from] MapError),
}

// ---------------------------------------------------------------------------
// Command line
// ---------------------------------------------------------------------------

/// A parsed command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Run {
        scenario: String,
        algorithm: Algorithm,
    },
    List,
    Help,
}

impl Command {
    /// Parse the arguments after the program name:
    /// `[scenario] [algorithm]`, `list` or `help`.
    pub fn parse<I>(args: I) -> Result<Self, DemoError>
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let args: Vec<String> = args.into_iter().map(Into::into).collect();
        match args.first().map(String::as_str) {
            Some("-h" | "--help" | "help") => return Ok(Command::Help),
            Some("list") => return Ok(Command::List),
            _ => {}
        }
        if let Some(extra) = args.get(2) {
            return Err(DemoError::UnexpectedArgument(extra.clone()));
        }
        let scenario = args
            .first()
            .cloned()
            .unwrap_or_else(|| DEFAULT_SCENARIO.to_string());
        let algorithm = match args.get(1) {
            Some(a) => a.parse()?,
            None => Algorithm::default(),
        };
        Ok(Command::Run {
            scenario,
            algorithm,
        })
    }
}

pub fn usage() -> String {
    format!(
        "usage: anyangle [scenario] [theta|strict|subgoal]\n       anyangle list\n\n\
         scenarios: {}\ndefault: {} strict",
        scenarios::NAMES.join(", "),
        DEFAULT_SCENARIO
    )
}

/// One line per catalogue scenario.
pub fn list() -> Result<String, DemoError> {
    let mut out = String::new();
    for s in scenarios::all()? {
        out.push_str(&format!(
            "{:<14} {:>3}x{:<3} {} -> {}\n",
            s.name,
            s.grid.width(),
            s.grid.height(),
            s.start,
            s.goal
        ));
    }
    Ok(out)
}

// ---------------------------------------------------------------------------
// Running
// ---------------------------------------------------------------------------

/// The result of one search, ready to print.
#[derive(Debug, Clone)]
pub struct Report {
    pub scenario: String,
    pub algorithm: Algorithm,
    pub size: Point,
    pub start: Point,
    pub goal: Point,
    pub outcome: SearchOutcome,
    pub path: Option<Vec<Point>>,
    pub stats: SearchStats,
    pub picture: String,
}

/// Look up `scenario` in the catalogue and solve it.
pub fn run(scenario: &str, algorithm: Algorithm) -> Result<Report, DemoError> {
    let s = scenarios::by_name(scenario)
        .ok_or_else(|| DemoError::UnknownScenario(scenario.to_string()))??;
    Ok(solve(&s, algorithm))
}

pub fn solve(s: &Scenario, algorithm: Algorithm) -> Report {
    match algorithm {
        Algorithm::Theta => report(s, algorithm, SearchEngine::theta_star(&s.grid)),
        Algorithm::Strict => report(s, algorithm, SearchEngine::strict_theta_star(&s.grid)),
        Algorithm::Subgoal => report(s, algorithm, SearchEngine::subgoal(&s.grid)),
    }
}

fn report<S: RelaxationStrategy>(
    s: &Scenario,
    algorithm: Algorithm,
    mut engine: SearchEngine<S>,
) -> Report {
    let outcome = engine.compute_path(s.start, s.goal);
    let path = engine.path().map(<[Point]>::to_vec);
    info!("{} on {}: {outcome:?}", algorithm, s.name);
    Report {
        scenario: s.name.clone(),
        algorithm,
        size: s.grid.size(),
        start: s.start,
        goal: s.goal,
        outcome,
        picture: render(&s.grid, path.as_deref().unwrap_or_default()),
        path,
        stats: engine.stats(),
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} ({}x{}), {}: {} -> {}",
            self.scenario, self.size.x, self.size.y, self.algorithm, self.start, self.goal
        )?;
        f.write_str(&self.picture)?;
        match (&self.outcome, &self.path) {
            (SearchOutcome::Found { cost }, Some(path)) => {
                let points: Vec<String> = path.iter().map(Point::to_string).collect();
                writeln!(f, "path: {}", points.join(" "))?;
                writeln!(f, "cost: {cost:.3}, {} waypoints", path.len())?;
            }
            (SearchOutcome::Aborted, _) => writeln!(f, "search aborted")?,
            _ => writeln!(f, "no path")?,
        }
        writeln!(
            f,
            "stats: {} expansions, {} relaxations, {} repairs",
            self.stats.expansions, self.stats.relaxations, self.stats.repairs
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyangle_core::GridGraph;

    #[test]
    fn parse_defaults() {
        assert_eq!(
            Command::parse(Vec::<String>::new()).unwrap(),
            Command::Run {
                scenario: "wall".into(),
                algorithm: Algorithm::Strict
            }
        );
        assert_eq!(
            Command::parse(["maze1", "Theta*"]).unwrap(),
            Command::Run {
                scenario: "maze1".into(),
                algorithm: Algorithm::Theta
            }
        );
        assert_eq!(Command::parse(["list"]).unwrap(), Command::List);
        assert_eq!(Command::parse(["--help", "x"]).unwrap(), Command::Help);
    }

    #[test]
    fn parse_errors() {
        assert!(matches!(
            Command::parse(["wall", "dijkstra"]),
            Err(DemoError::UnknownAlgorithm(a)) if a == "dijkstra"
        ));
        assert!(matches!(
            Command::parse(["wall", "sg", "x"]),
            Err(DemoError::UnexpectedArgument(a)) if a == "x"
        ));
        assert!(matches!(
            run("nowhere", Algorithm::Strict),
            Err(DemoError::UnknownScenario(_))
        ));
    }

    #[test]
    fn every_algorithm_solves_wall() {
        for algorithm in Algorithm::ALL {
            let report = run("wall", algorithm).unwrap();
            let cost = report.outcome.cost().unwrap();
            assert!((cost - 7.767828).abs() < 1e-4, "{algorithm}: {cost}");
            let text = report.to_string();
            assert!(text.contains("cost: 7.768, 4 waypoints"), "{text}");
            assert!(text.contains("path: (0, 2) (2, 5) (3, 5) (4, 2)"), "{text}");
        }
    }

    #[test]
    fn unreachable_report() {
        let mut grid = GridGraph::new(3, 2);
        grid.fill(anyangle_core::Range::new(1, 0, 2, 2), true);
        let s = Scenario::new("cut", grid, Point::new(0, 0), Point::new(3, 2)).unwrap();
        let report = solve(&s, Algorithm::Subgoal);
        assert_eq!(report.outcome, SearchOutcome::Unreachable);
        assert!(report.to_string().contains("no path"));
    }

    #[test]
    fn list_names_every_scenario() {
        let text = list().unwrap();
        assert_eq!(text.lines().count(), scenarios::NAMES.len());
        assert!(text.starts_with("wall"));
    }
}
