use anyhow::{bail, Context};
use log::{debug, info};
use parking::{
    editor::GridEditor,
    render::{spot_lines, Overlay},
    util::load_grid,
    SearchConfig,
};

const USAGE: &str = "usage: parkfind <grid.csv|grid.json|grid.png> <start-row> <start-col> [config.json]";

fn main() -> Result<(), anyhow::Error> {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.len() < 3 || args.len() > 4 {
        bail!(USAGE);
    }

    let grid = load_grid(&args[0])?;
    let row: i64 = args[1].parse().context("start row must be an integer")?;
    let col: i64 = args[2].parse().context("start column must be an integer")?;

    let config = match args.get(3) {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path))?;
            SearchConfig::from_json(&text).with_context(|| format!("invalid config {}", path))?
        }
        None => SearchConfig::default(),
    };
    info!("search config: {:?}", config);

    let mut editor = GridEditor::default();
    editor.load_grid(&grid);
    editor.set_config(config);

    let finder = editor.snapshot()?;
    let start = finder.point(row, col)?;
    info!(
        "{}x{} grid with {} empty cells, start {}",
        finder.rows(),
        finder.columns(),
        finder.grid().count_empty(),
        start
    );

    let (state, visited) = finder.spot_finder(start)?.finish(finder.grid());
    debug!("explored distances:\n{}", visited);

    let spots = state.into_spots();
    if spots.is_empty() {
        println!("No empty parking spots found.");
        print!("{}", Overlay::new(finder.grid()).with_start(start));
        return Ok(());
    }

    println!("The closest parking spots are:\n");
    print!("{}", spot_lines(&spots));

    let route = finder.route_to(start, spots[0].point)?;
    info!("route to {} has {} steps", spots[0].point, route.len().saturating_sub(1));
    println!(
        "\nRoute: {}\n",
        route
            .iter()
            .map(|p| p.to_string())
            .collect::<Vec<_>>()
            .join(" -> ")
    );

    print!(
        "{}",
        Overlay::new(finder.grid())
            .with_start(start)
            .with_spots(&spots)
            .with_route(&route)
    );

    Ok(())
}
