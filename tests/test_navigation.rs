mod common;

use common::{center, parse_maze, CELL};
use mazenav::nav_log::NavEvent;
use mazenav::{
    Autopilot, AutopilotState, Cell, MazeLayout, NavConfig, NavError, Navigator, Obstacle, Point, Route,
    RouteKind,
};

/// Move a point agent under autopilot until it lets go; returns the frame count
fn drive(nav: &mut Navigator, position: &mut Point, speed: f32, max_frames: usize) -> usize {
    for frame in 0..max_frames {
        match nav.tick(*position, false) {
            Some(steer) => {
                let length = (steer.x * steer.x + steer.y * steer.y).sqrt();
                assert!((length - 1.0).abs() < 1e-4, "steering must be a unit vector");
                position.x += steer.x * speed;
                position.y += steer.y * speed;
                nav.observe(*position);
            }
            None => return frame,
        }
    }
    panic!("autopilot did not finish within {} frames", max_frames);
}

#[test]
fn test_five_waypoint_route_finishes_after_four_arrivals() {
    let route = Route::new(
        RouteKind::Shortest,
        (0..5).map(|i| Point::new(20.0 + i as f32 * 40.0, 20.0)).collect(),
    );
    let mut pilot = Autopilot::new();
    assert!(pilot.activate(route.clone()));

    let mut arrivals = 0;
    for i in 1..5 {
        let before = pilot.session().map(|s| s.cursor);
        pilot.tick(route.waypoints()[i], 8.0, false);
        let after = pilot.session().map(|s| s.cursor);
        if before != after {
            arrivals += 1;
        }
    }
    assert_eq!(arrivals, 4);
    assert_eq!(pilot.state(), AutopilotState::Idle);
}

#[test]
fn test_manual_input_cancels_anywhere() {
    for offset in [0.0, 3.0, 500.0] {
        let mut pilot = Autopilot::new();
        pilot.activate(Route::new(
            RouteKind::Longest,
            vec![Point::new(0.0, 0.0), Point::new(100.0, 0.0), Point::new(200.0, 0.0)],
        ));
        assert_eq!(pilot.tick(Point::new(100.0 + offset, 0.0), 8.0, true), None);
        assert_eq!(pilot.state(), AutopilotState::Idle);
    }
}

#[test]
fn test_drive_through_maze_then_retrace() {
    let fixture = parse_maze(
        r#"
        ■■■■■■■■■
        ■s□□■□□□■
        ■■■□■□■□■
        ■□□□□□■□■
        ■□■■■■■g■
        ■■■■■■■■■
        "#,
    );
    let grid = &fixture.grid;
    let start = center(grid, fixture.start.unwrap());
    let goal = center(grid, fixture.goal.unwrap());

    let mut nav = Navigator::new(NavConfig::default(), &fixture.layout, goal);
    let mut position = start;
    nav.reset_trajectory(position);

    let waypoints = nav.request_route(RouteKind::Shortest, position).unwrap();
    // s(1,1) -> (3,1) -> (3,3) -> (5,3) -> (5,1) -> (7,1) -> g(7,4)
    assert_eq!(waypoints, 14);

    drive(&mut nav, &mut position, 5.0, 10_000);
    assert!(position.distance(&goal) < nav.config().arrival_threshold());
    assert_eq!(nav.grid().world_to_cell(position), fixture.goal.unwrap());

    nav.request_route(RouteKind::Retrace, position).unwrap();
    drive(&mut nav, &mut position, 5.0, 10_000);
    assert!(position.distance(&start) < nav.config().arrival_threshold());

    let events: Vec<NavEvent> = nav.log().events().iter().map(|e| e.event.clone()).collect();
    assert_eq!(events.len(), 4);
    assert_eq!(events[0], NavEvent::RouteActivated { kind: RouteKind::Shortest, waypoints: 14 });
    assert_eq!(events[1], NavEvent::Arrived { kind: RouteKind::Shortest });
    assert!(matches!(events[2], NavEvent::RouteActivated { kind: RouteKind::Retrace, .. }));
    assert_eq!(events[3], NavEvent::Arrived { kind: RouteKind::Retrace });
}

#[test]
fn test_requests_on_unreachable_goal() {
    let fixture = parse_maze(
        r#"
        s□■□
        □□■g
        "#,
    );
    let grid = &fixture.grid;
    let mut nav = Navigator::new(NavConfig::default(), &fixture.layout, center(grid, fixture.goal.unwrap()));
    let here = center(grid, fixture.start.unwrap());

    assert_eq!(
        nav.request_route(RouteKind::Shortest, here),
        Err(NavError::NoRoute { kind: RouteKind::Shortest })
    );
    // The longest route still explores the reachable side
    assert_eq!(nav.request_route(RouteKind::Longest, here), Ok(3));
}

#[test]
fn test_rebuild_opens_new_route() {
    let closed = MazeLayout::new(3 * CELL, CELL, vec![Obstacle::new(CELL, 0, CELL, CELL)]);
    let open = MazeLayout::new(3 * CELL, CELL, Vec::new());
    let goal = Point::new(2.5 * CELL as f32, 0.5 * CELL as f32);
    let here = Point::new(0.5 * CELL as f32, 0.5 * CELL as f32);

    let mut nav = Navigator::new(NavConfig::default(), &closed, goal);
    assert!(nav.request_route(RouteKind::Shortest, here).is_err());

    nav.rebuild(&open);
    assert_eq!(nav.request_route(RouteKind::Shortest, here), Ok(3));
    assert!(!nav.grid().is_blocked(Cell::new(1, 0)));
}

#[test]
fn test_driving_maze_reaches_every_marker_once() {
    let fixture = parse_maze(
        r#"
        ■■■■■■■■■
        ■s□□■□□□■
        ■■■□■□■□■
        ■□□□□□■□■
        ■□■■■■■g■
        ■■■■■■■■■
        "#,
    );
    let grid = &fixture.grid;
    let start = center(grid, fixture.start.unwrap());
    let goal = center(grid, fixture.goal.unwrap());

    let mut nav = Navigator::new(NavConfig::default(), &fixture.layout, goal);
    let mut position = start;
    nav.reset_trajectory(position);
    // 14 waypoints: markers at waypoints 3 and 4
    assert_eq!(nav.place_markers(start), 2);

    nav.request_route(RouteKind::Shortest, position).unwrap();
    assert!(nav.drive(&mut position, 10_000).is_ok());
    assert!(nav.markers().iter().all(|m| m.reached));

    let labels: Vec<String> = nav
        .log()
        .events()
        .iter()
        .filter_map(|e| match &e.event {
            NavEvent::MarkerReached { label } => Some(label.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(labels, vec!["1/4".to_string(), "1/3".to_string()]);
}
