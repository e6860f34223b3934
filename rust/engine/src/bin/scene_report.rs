// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! CLI tool: resolve a scene document and report what the viewer would draw
//!
//! Loads a scene (JSON), applies a render mode and optional data selection,
//! prints a per-surface summary and optionally writes the legend as PNG.
//!
//! Usage:
//!   scene-report <scene.json> [options]

use std::env;
use std::fs;

use bemview_engine::{
    legend, DrawItem, MemoryPreferences, RenderMode, ViewerConfig, ViewerState, Viewport,
};
use bemview_scene::{Palette, Scene};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            env::var("RUST_LOG").unwrap_or_else(|_| "info,bemview_engine=debug".into()),
        )
        .init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        print_usage();
        return;
    }

    let scene_path = &args[1];

    let mut mode = RenderMode::SurfaceType;
    let mut palette: Option<Palette> = None;
    let mut variable: Option<String> = None;
    let mut day: f64 = 0.0;
    let mut hour: f64 = 1.0;
    let mut story: Option<String> = None;
    let mut legend_path: Option<String> = None;

    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--mode" => {
                i += 1;
                mode = args[i].parse().unwrap_or_else(|e| {
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                });
            }
            "--palette" => {
                i += 1;
                palette = Some(args[i].parse().expect("Invalid palette name"));
            }
            "--variable" => {
                i += 1;
                variable = Some(args[i].clone());
            }
            "--day" => {
                i += 1;
                day = args[i].parse().expect("Invalid day value");
            }
            "--hour" => {
                i += 1;
                hour = args[i].parse().expect("Invalid hour value");
            }
            "--story" => {
                i += 1;
                story = Some(args[i].clone());
            }
            "--legend" => {
                i += 1;
                legend_path = Some(args[i].clone());
            }
            other => {
                eprintln!("Unknown option: {}", other);
                print_usage();
                std::process::exit(1);
            }
        }
        i += 1;
    }

    let json = fs::read_to_string(scene_path).unwrap_or_else(|e| {
        eprintln!("Error: Cannot read '{}': {}", scene_path, e);
        std::process::exit(1);
    });
    let scene = Scene::from_json(&json).unwrap_or_else(|e| {
        eprintln!("Error: Cannot load scene '{}': {}", scene_path, e);
        std::process::exit(1);
    });

    let config = ViewerConfig::from_env();
    let mut viewer = ViewerState::new(
        scene,
        config,
        Box::new(MemoryPreferences::new()),
        Viewport::new(1280.0, 720.0),
    );

    if let Some(palette) = palette {
        viewer.set_palette(palette);
    }
    if let Some(story) = &story {
        viewer.set_story(story);
    }
    if let Some(name) = &variable {
        if let Err(e) = viewer.set_variable(name) {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
    viewer.set_day(day);
    viewer.set_hour(hour);
    if let Err(e) = viewer.set_mode(mode) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    println!("=== Scene Report ===");
    println!();
    println!("  Surfaces:     {}", viewer.scene().len());
    println!("  Appearances:  {}", viewer.scene().catalogue.len());
    println!("  Coincident:   {}", viewer.coincidence().pair_count());
    println!("  Variables:    {}", viewer.scene().variables().len());
    println!("  Mode:         {}", viewer.settings().mode);
    println!("  Story:        {}", viewer.settings().story.label());
    if let Some(label) = viewer.date_time_label() {
        println!("  Interval:     {}", label);
    }
    println!();

    let state = viewer.render_state();
    println!(
        "  Visible: {} / {}   Ghosts: {}",
        state.visible_count(),
        state.len(),
        state.ghost_count()
    );
    println!();

    for item in viewer.draw_list() {
        if let DrawItem::Surface {
            key,
            name,
            appearance,
            ..
        } = item
        {
            let value = state
                .get(key)
                .and_then(|s| s.data.as_ref())
                .and_then(|d| d.value)
                .map(|v| format!("  {}", v))
                .unwrap_or_default();
            println!(
                "  {:<40} {:<24} {}{}",
                name,
                appearance.name,
                appearance.color.to_hex_string(),
                value
            );
        }
    }

    if let Some(labels) = viewer.legend_labels() {
        println!();
        println!("  Legend: {} .. {}", labels.min, labels.max);
    }

    if let Some(path) = legend_path {
        match legend::save_png(&viewer.legend_raster(), &path) {
            Ok(()) => println!("  Legend saved: {}", path),
            Err(e) => {
                eprintln!("Error: Could not save legend: {}", e);
                std::process::exit(1);
            }
        }
    }
}

fn print_usage() {
    println!("Usage: scene-report <scene.json> [options]");
    println!();
    println!("Options:");
    println!("  --mode <name>        Render mode (default: \"Surface Type\")");
    println!("                       surfacetype, normal, boundary, construction,");
    println!("                       thermalzone, spacetype, buildingstory, data");
    println!("  --palette <name>     grayscale, sequential, diverging, rainbow");
    println!("  --variable <name>    Output variable for Data mode");
    println!("  --day <n>            Day index (default: 0)");
    println!("  --hour <n>           Hour, 1-based (default: 1)");
    println!("  --story <name>       Show only one building story");
    println!("  --legend <out.png>   Write the legend raster as PNG");
    println!();
    println!("Environment:");
    println!("  BEMVIEW_LEGEND_WIDTH, BEMVIEW_LEGEND_HEIGHT, BEMVIEW_ORBIT_DURATION_SECS,");
    println!("  BEMVIEW_RADIUS_FACTOR, BEMVIEW_PERSPECTIVE_FOV_DEG, BEMVIEW_NEAR, BEMVIEW_FAR");
}
