use mazenav::pathfinding::format_route;
use mazenav::{Cell, MazeLayout, NavConfig, Navigator, Point, Route, RouteKind};
use log::{error, info};
use std::collections::HashSet;
use std::env;
use std::process;

/// Safety cap on simulated frames per drive
const MAX_TICKS: usize = 20_000;

struct Args {
    layout_path: Option<String>,
    start: Option<Point>,
    goal: Option<Point>,
}

fn parse_point(text: &str) -> Option<Point> {
    let (x, y) = text.split_once(',')?;
    Some(Point::new(x.trim().parse().ok()?, y.trim().parse().ok()?))
}

fn parse_args() -> Result<Args, String> {
    let mut args = Args {
        layout_path: None,
        start: None,
        goal: None,
    };
    let mut iter = env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--start" | "--goal" => {
                let value = iter.next().ok_or_else(|| format!("{} needs a value x,y", arg))?;
                let point = parse_point(&value).ok_or_else(|| format!("Bad point '{}'", value))?;
                if arg == "--start" {
                    args.start = Some(point);
                } else {
                    args.goal = Some(point);
                }
            }
            path if args.layout_path.is_none() => args.layout_path = Some(path.to_string()),
            other => return Err(format!("Unexpected argument '{}'", other)),
        }
    }
    Ok(args)
}

/// ASCII map: S start, G goal, * route, # blocked, . free
fn render_map(nav: &Navigator, route: &Route, start: Point) -> String {
    let grid = nav.grid();
    let on_route: HashSet<Cell> = route
        .waypoints()
        .iter()
        .map(|&p| grid.world_to_cell(p))
        .collect();
    let start_cell = grid.world_to_cell(start);
    let goal_cell = grid.world_to_cell(nav.goal());

    let mut result = String::new();
    for row in 0..grid.rows {
        for col in 0..grid.cols {
            let cell = Cell::new(col, row);
            let symbol = if cell == start_cell {
                'S'
            } else if cell == goal_cell {
                'G'
            } else if on_route.contains(&cell) {
                '*'
            } else if grid.is_blocked(cell) {
                '#'
            } else {
                '.'
            };
            result.push(symbol);
        }
        result.push('\n');
    }
    result
}

fn report(nav: &Navigator, route: &Route, start: Point) {
    println!("\n=== {} route ===", route.kind());
    println!(
        "{} waypoints, {} steps, length {:.1}",
        route.len(),
        route.steps(),
        route.length()
    );
    for marker in route.progress_markers() {
        println!(
            "  marker {} at waypoint {} ({}, {})",
            marker.label, marker.index, marker.position.x, marker.position.y
        );
    }
    if route.len() <= 12 {
        println!("{}", format_route(route));
    }
    println!("{}", render_map(nav, route, start));
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = match parse_args() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("{}", e);
            eprintln!("Usage: mazenav [layout.json] [--start x,y] [--goal x,y]");
            process::exit(2);
        }
    };

    let config = NavConfig::load();
    let layout = match &args.layout_path {
        Some(path) => match MazeLayout::load_from_file(path) {
            Ok(layout) => layout,
            Err(e) => {
                error!("{}: {}", path, e);
                process::exit(1);
            }
        },
        None => MazeLayout::bordered(1200, 800, config.grid.cell_size),
    };

    let cell = config.grid.cell_size as f32;
    let start = args.start.unwrap_or(Point::new(cell * 1.5, cell * 1.5));
    let goal = args.goal.unwrap_or(Point::new(
        layout.world_width as f32 - cell * 3.0,
        layout.world_height as f32 - cell * 3.0,
    ));

    let save_log = config.logging.enable_nav_log;
    let log_path = config.logging.nav_log_path.clone();
    let mut nav = Navigator::new(config, &layout, goal);
    info!(
        "Grid {}x{} ({} blocked), start ({}, {}), goal ({}, {})",
        nav.grid().cols,
        nav.grid().rows,
        nav.grid().blocked_count(),
        start.x,
        start.y,
        goal.x,
        goal.y
    );

    let longest = nav.plan(RouteKind::Longest, start);
    report(&nav, &longest, start);

    let shortest = nav.plan(RouteKind::Shortest, start);
    report(&nav, &shortest, start);

    let mut position = start;
    nav.reset_trajectory(position);
    nav.place_markers(start);
    if nav.request_route(RouteKind::Shortest, position).is_ok() {
        match nav.drive(&mut position, MAX_TICKS) {
            Ok(frames) => println!(
                "Drove to ({:.1}, {:.1}) in {} frames, {} trajectory samples",
                position.x,
                position.y,
                frames,
                nav.recorder().len()
            ),
            Err(e) => println!("{} (stopped at ({:.1}, {:.1}))", e, position.x, position.y),
        }
        let reached: Vec<&str> = nav
            .markers()
            .iter()
            .filter(|m| m.reached)
            .map(|m| m.marker.label.as_str())
            .collect();
        println!("Progress markers reached: {}/{} {:?}", reached.len(), nav.markers().len(), reached);

        match nav.request_route(RouteKind::Retrace, position) {
            Ok(_) => match nav.drive(&mut position, MAX_TICKS) {
                Ok(frames) => println!(
                    "Retraced to ({:.1}, {:.1}) in {} frames",
                    position.x, position.y, frames
                ),
                Err(e) => println!("{} (stopped at ({:.1}, {:.1}))", e, position.x, position.y),
            },
            Err(e) => println!("{}", e),
        }
    } else {
        println!("Goal unreachable from start");
    }

    println!("\n{}", nav.log().summary());
    if save_log {
        if let Err(e) = nav.log().save_to_file(&log_path) {
            error!("Failed to write {}: {}", log_path, e);
        }
    }
}
