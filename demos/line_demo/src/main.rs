// Copyright 2026 the Tether Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Draws random lines on a headless screen.
//!
//! A producer thread plays the part of user input: it drops lines at random
//! places, pins a marker to the latest line, and fades every third line out.
//! The main thread is the render thread and runs the queue until the
//! producer is done, then prints the presented tree.

use std::str::FromStr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

use clap::Parser;
use kurbo::{Point, Size, Vec2};
use log::{LevelFilter, debug, error, info};
use rand::Rng;
use tether_core::align::{XAlign, YAlign};
use tether_core::entity::EntityId;
use tether_core::screen::{Screen, ScreenConfig};
use tether_headless::presenter::HeadlessPresenter;
use tether_headless::shapes::{Block, Line};

/// Command-line options.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Number of lines to draw.
    #[arg(short = 'n', long, default_value_t = 12)]
    lines: usize,

    /// Pause between lines, in milliseconds.
    #[arg(short, long, default_value_t = 5)]
    interval_ms: u64,

    /// Screen width.
    #[arg(long, default_value_t = 800.0)]
    width: f64,

    /// Screen height.
    #[arg(long, default_value_t = 600.0)]
    height: f64,

    /// Display scale applied to presented offsets.
    #[arg(long, default_value_t = 1.0)]
    scale: f64,

    /// Log level (off, error, warn, info, debug, trace).
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() {
    let args = Args::parse();

    let log_level = LevelFilter::from_str(&args.log_level).unwrap_or_else(|_| {
        eprintln!("Invalid log level: {}. Using 'info' instead.", args.log_level);
        LevelFilter::Info
    });
    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(log_level)
        .init();
    debug!(args:?; "Parsed arguments");
    if !(args.width > 0.0 && args.height > 0.0) {
        error!(width = args.width, height = args.height; "Screen size must be positive");
        std::process::exit(2);
    }

    let config = ScreenConfig::new(Size::new(args.width, args.height)).with_scale(args.scale);
    let (screen, queue) = Screen::new(config);
    let syncs = Arc::new(AtomicUsize::new(0));

    let producer = {
        let screen = screen.clone();
        let syncs = Arc::clone(&syncs);
        let interval = Duration::from_millis(args.interval_ms);
        let count = args.lines;
        thread::spawn(move || draw(&screen, count, interval, &syncs))
    };
    // The queue disconnects once the producer's screen handle and every
    // queued task are gone.
    drop(screen);

    let mut presenter = HeadlessPresenter::new();
    let tasks = queue.run(&mut presenter);
    let ids = producer.join().unwrap_or_else(|_| {
        eprintln!("producer thread panicked");
        std::process::exit(1);
    });

    let stats = presenter.stats();
    info!(
        tasks,
        listener_calls = syncs.load(Ordering::Relaxed),
        attaches = stats.attaches,
        detaches = stats.detaches,
        applies = stats.applies;
        "Render queue finished"
    );
    println!("{}", presenter.dump());
    for id in ids {
        if let Some(origin) = presenter.world_origin(id) {
            println!("{id:?} presented at ({:.1}, {:.1})", origin.x, origin.y);
        }
    }
}

/// Producer side. Returns the ids it created, markers last.
fn draw(
    screen: &Screen,
    count: usize,
    interval: Duration,
    syncs: &Arc<AtomicUsize>,
) -> Vec<EntityId> {
    let mut rng = rand::rng();
    let size = screen.size();
    let half = Vec2::new(size.width, size.height) / 2.0;
    let mut ids = Vec::with_capacity(count + 1);

    for n in 0..count {
        // Y up, origin at the bottom-left corner.
        let p0 = Point::new(
            rng.random_range(0.0..size.width),
            rng.random_range(0.0..size.height),
        );
        let p1 = Point::new(
            rng.random_range(0.0..size.width),
            rng.random_range(0.0..size.height),
        );
        let line = Arc::new(Line::with_color(p0, p1, rng.random::<u32>() | 0xff));
        let id = screen.create_entity(line);

        // Centered on both axes, so the offset is the midpoint relative to
        // the screen center.
        let offset = p0.midpoint(p1).to_vec2() - half;
        screen.set_offset(id, offset.x, offset.y);
        let counter = Arc::clone(syncs);
        screen.add_change_listener(id, move || {
            counter.fetch_add(1, Ordering::Relaxed);
        });
        if n % 3 == 2 {
            screen.set_opacity(id, 0.0);
        }
        debug!(entity:? = id, from:? = p0, to:? = p1; "Line drawn");
        ids.push(id);
        thread::sleep(interval);
    }

    if let Some(&last) = ids.last() {
        let marker = screen.create_entity(Arc::new(Block::new(Size::new(6.0, 6.0))));
        screen.set_anchor(marker, last);
        screen.set_x_align(marker, XAlign::Right);
        screen.set_y_align(marker, YAlign::Top);
        screen.set_z(marker, 1.0);
        let center = screen.screen_center(marker);
        info!(entity:? = marker, x = center.x, y = center.y; "Marker pinned");
        ids.push(marker);
    }
    ids
}
