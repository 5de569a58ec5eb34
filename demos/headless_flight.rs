use tunnel_flyer::camera::Camera;
use tunnel_flyer::config::Config;
use tunnel_flyer::flight::FlightController;
use tunnel_flyer::labels::LabelSet;
use tunnel_flyer::scene::build_scene;
use tunnel_flyer::spline::{tunnel_control_points, CurvePath};

const TICK_RATE_HZ: f32 = 60.0;
const SETTLE_EPSILON: f32 = 1e-4;

fn main() {
    env_logger::init();

    println!("\n{:=<60}", "");
    println!(
        "HEADLESS FLIGHT  [{}]",
        chrono::Local::now().format("%H:%M:%S")
    );
    println!("{:=<60}", "");

    let config = Config::default();

    println!("\n[1/3] Building curve and scene...");
    let start = std::time::Instant::now();
    let path = CurvePath::new(tunnel_control_points()).expect("control points are valid");
    println!(
        "      Curve: {} control points, length {:.2}",
        path.control_point_count(),
        path.total_length()
    );
    let scene = build_scene(&path, &config.tube, &config.boxes);
    println!(
        "      Scene: {} line vertices in {:.2}ms",
        scene.vertex_count(),
        start.elapsed().as_secs_f64() * 1000.0
    );

    report_step_uniformity(&path);

    println!("\n[2/3] Scroll convergence at {} Hz...", TICK_RATE_HZ);
    let labels = LabelSet::along_path(&path, &config.labels);
    let mut controller = FlightController::new(path, &config.flight);

    // Wheel impulses in browser pixels: two ordinary flicks, then a hard
    // pull that clamps at the start of the loop.
    for impulse in [-1000.0_f32, 2500.0, 1.0e7] {
        controller.on_scroll_delta(impulse);
        let target = controller.scroll().target;
        let mut ticks = 0u32;
        while (target - controller.scroll().current).abs() >= SETTLE_EPSILON {
            controller.tick();
            ticks += 1;
            if ticks > 10_000 {
                break;
            }
        }
        println!(
            "      impulse {:>10.0}px -> target {:.4}, settled in {} ticks ({:.2}s)",
            impulse,
            target,
            ticks,
            ticks as f32 / TICK_RATE_HZ
        );
    }

    println!("\n[3/3] Label visibility sweep...");
    let mut camera = Camera::new(
        config.camera.fov_degrees,
        config.camera.near,
        config.camera.far,
        1280.0,
        720.0,
    );
    for step in 0..10 {
        let progress = step as f32 / 10.0;
        camera.set_pose(controller.pose_at(progress));
        let anchors = labels.anchors(&camera);
        let visible = anchors.iter().filter(|a| a.visible).count();
        print!("      p={:.1}: {} visible", progress, visible);
        for (label, anchor) in labels.labels().iter().zip(&anchors) {
            if anchor.visible {
                print!("  [{} @ {:.0},{:.0}]", label.text, anchor.x, anchor.y);
            }
        }
        println!();
    }

    println!("\n{:=<60}", "");
    println!(
        "DONE  [{}]",
        chrono::Local::now().format("%H:%M:%S")
    );
    println!("{:=<60}", "");
}

/// Checks that equal progress steps cover near-equal distances.
fn report_step_uniformity(path: &CurvePath) {
    let samples = 256;
    let mut min_step = f32::INFINITY;
    let mut max_step: f32 = 0.0;
    let mut previous = path.point_at(0.0);
    for i in 1..=samples {
        let point = path.point_at(i as f32 / samples as f32);
        let step = previous.distance(point);
        min_step = min_step.min(step);
        max_step = max_step.max(step);
        previous = point;
    }
    println!(
        "      Step uniformity over {} samples: min {:.4}, max {:.4} (ratio {:.3})",
        samples,
        min_step,
        max_step,
        max_step / min_step
    );
}
