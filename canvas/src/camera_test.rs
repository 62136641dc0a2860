#![allow(clippy::float_cmp)]

use super::*;

const EPSILON: f64 = 1e-9;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn point_approx_eq(a: Point, b: Point) -> bool {
    approx_eq(a.x, b.x) && approx_eq(a.y, b.y)
}

// --- Point ---

#[test]
fn point_new() {
    let p = Point::new(3.0, 4.0);
    assert_eq!(p.x, 3.0);
    assert_eq!(p.y, 4.0);
}

#[test]
fn point_is_finite_rejects_nan_on_either_axis() {
    assert!(Point::new(1.0, 2.0).is_finite());
    assert!(!Point::new(f64::NAN, 2.0).is_finite());
    assert!(!Point::new(1.0, f64::NAN).is_finite());
    assert!(!Point::new(f64::INFINITY, 0.0).is_finite());
}

// --- Camera defaults ---

#[test]
fn camera_default_is_identity() {
    let cam = Camera::default();
    assert_eq!(cam.pan_x, 0.0);
    assert_eq!(cam.pan_y, 0.0);
    assert_eq!(cam.zoom, 1.0);
}

// --- screen_to_world ---

#[test]
fn screen_to_world_identity() {
    let cam = Camera::default();
    let world = cam.screen_to_world(Point::new(50.0, 75.0));
    assert!(point_approx_eq(world, Point::new(50.0, 75.0)));
}

#[test]
fn screen_to_world_with_pan_and_zoom() {
    let cam = Camera { pan_x: 20.0, pan_y: 10.0, zoom: 2.0 };
    let world = cam.screen_to_world(Point::new(20.0, 10.0));
    assert!(point_approx_eq(world, Point::new(0.0, 0.0)));
    let world = cam.screen_to_world(Point::new(40.0, 30.0));
    assert!(point_approx_eq(world, Point::new(10.0, 10.0)));
}

// --- world_to_screen ---

#[test]
fn world_to_screen_with_pan_and_zoom() {
    let cam = Camera { pan_x: 20.0, pan_y: 10.0, zoom: 3.0 };
    let screen = cam.world_to_screen(Point::new(5.0, 5.0));
    // 5*3 + 20 = 35, 5*3 + 10 = 25
    assert!(approx_eq(screen.x, 35.0));
    assert!(approx_eq(screen.y, 25.0));
}

// --- Round trips ---

#[test]
fn round_trip_screen_first_over_a_grid_of_cameras() {
    let pans = [-500.0, -13.7, 0.0, 42.3, 900.0];
    let zooms = [0.1, 0.35, 0.75, 1.0, 2.5, 10.0];
    let screens = [Point::new(0.0, 0.0), Point::new(400.0, 300.0), Point::new(-12.5, 1999.25)];
    for &pan in &pans {
        for &zoom in &zooms {
            let cam = Camera { pan_x: pan, pan_y: -pan * 0.5, zoom };
            for &screen in &screens {
                let back = cam.world_to_screen(cam.screen_to_world(screen));
                assert!(point_approx_eq(screen, back), "pan={pan} zoom={zoom} screen={screen:?} back={back:?}");
            }
        }
    }
}

#[test]
fn round_trip_world_first() {
    let cam = Camera { pan_x: 13.7, pan_y: -42.3, zoom: 0.75 };
    let world = Point::new(333.3, -999.9);
    let back = cam.screen_to_world(cam.world_to_screen(world));
    assert!(point_approx_eq(world, back));
}

// --- pan / zoom ---

#[test]
fn pan_by_adds_raw_delta_regardless_of_zoom() {
    let mut cam = Camera { pan_x: 10.0, pan_y: 10.0, zoom: 4.0 };
    cam.pan_by(Point::new(5.0, -3.0));
    assert_eq!(cam.pan_x, 15.0);
    assert_eq!(cam.pan_y, 7.0);
    assert_eq!(cam.zoom, 4.0);
}

#[test]
fn zoom_by_is_linear() {
    let mut cam = Camera::default();
    cam.zoom_by(0.25, 0.1);
    assert!(approx_eq(cam.zoom, 1.25));
    cam.zoom_by(-0.5, 0.1);
    assert!(approx_eq(cam.zoom, 0.75));
}

#[test]
fn zoom_by_clamps_at_minimum() {
    let mut cam = Camera { pan_x: 0.0, pan_y: 0.0, zoom: 0.2 };
    cam.zoom_by(-0.25, 0.1);
    assert_eq!(cam.zoom, 0.1);
    cam.zoom_by(-0.25, 0.1);
    assert_eq!(cam.zoom, 0.1);
}

#[test]
fn reset_returns_to_default() {
    let mut cam = Camera { pan_x: 99.0, pan_y: -4.0, zoom: 3.0 };
    cam.reset();
    assert_eq!(cam, Camera::default());
}
