//! Aaron CLI - inspect and re-save car data files.

use aaron::bounds::{forest_len, BoundNode};
use aaron::hash::{format_identifier, string_to_identifier};
use aaron::prelude::{Overrides, Session, Settings};
use std::env;
use std::path::{Path, PathBuf};

use tracing_subscriber::EnvFilter;

const VERSION: &str = env!("CARGO_PKG_VERSION");
const BUILD_DATE: &str = env!("AARON_BUILD_DATE");

fn main() {
    let args: Vec<String> = env::args().collect();

    // Parse global flags
    let mut level = "info";
    let mut dict: Option<PathBuf> = None;
    let mut world = false;
    let mut filtered_args: Vec<&str> = Vec::new();
    let mut iter = args[1..].iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-v" | "--verbose" => level = "debug",
            "-vv" | "--trace" => level = "trace",
            "-q" | "--quiet" => level = "error",
            "--world" | "-w" => world = true,
            "--dict" | "-d" => match iter.next() {
                Some(path) => dict = Some(PathBuf::from(path)),
                None => fail("--dict needs a path"),
            },
            "--version" | "-V" => {
                println!("aaron-cli {} ({})", VERSION, BUILD_DATE);
                return;
            }
            _ => filtered_args.push(arg.as_str()),
        }
    }

    init_tracing(level);

    if filtered_args.is_empty() {
        print_help();
        return;
    }

    // Flags and environment apply to this run only; settings.json keeps
    // what the user saved plus the recent files list.
    let mut overrides = Overrides::from_env();
    if world {
        overrides.use_pivot = Some(false);
    }
    if dict.is_some() {
        overrides.dictionary_path = dict;
    }
    let mut session = Session::with_overrides(Settings::load(), overrides);

    match filtered_args[0] {
        // Info command - document summary
        "info" | "i" => {
            let file = require_arg(&filtered_args, 1, "aaron info <file.json>");
            cmd_info(&mut session, file);
        }

        // Tree command - bounds hierarchy
        "tree" | "t" => {
            let file = require_arg(&filtered_args, 1, "aaron tree <file.json> [--world]");
            cmd_tree(&mut session, file);
        }

        // Resave command - decode and encode again
        "resave" | "r" => {
            let file = require_arg(&filtered_args, 1, "aaron resave <file.json> [out.json]");
            cmd_resave(&mut session, file, filtered_args.get(2).copied());
        }

        "hash" | "h" => {
            require_arg(&filtered_args, 1, "aaron hash <text>...");
            for text in &filtered_args[1..] {
                match string_to_identifier(text) {
                    Ok(id) => println!("{:<32} {} ({})", text, format_identifier(id), id),
                    Err(e) => fail(&e.to_string()),
                }
            }
        }

        "resolve" => {
            require_arg(&filtered_args, 1, "aaron resolve <id>...");
            for text in &filtered_args[1..] {
                let id = match parse_id(text) {
                    Some(id) => id,
                    None => fail(&format!("not an identifier: {}", text)),
                };
                println!("{} -> {}", format_identifier(id), session.resolver().resolve(id));
            }
        }

        "help" | "--help" | "-h" => print_help(),

        cmd => {
            eprintln!("Unknown command: {}", cmd);
            print_help();
            std::process::exit(1);
        }
    }

    if let Err(e) = session.into_settings().save() {
        tracing::warn!("could not save settings: {}", e);
    }
}

fn init_tracing(default_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn print_help() {
    println!("aaron - car data / collision bounds toolkit");
    println!();
    println!("USAGE:");
    println!("    aaron-cli [OPTIONS] <COMMAND> [ARGS]");
    println!();
    println!("COMMANDS:");
    println!("    i, info    <file>              Show document fields and bound counts");
    println!("    t, tree    <file>              Show the bounds hierarchy");
    println!("    r, resave  <file> [out]        Decode and re-encode (default out: <file>_saved.json)");
    println!("    h, hash    <text>...           Print identifiers for names or 0x literals");
    println!("       resolve <id>...             Print names for identifiers (decimal or 0x)");
    println!();
    println!("OPTIONS:");
    println!("    -d, --dict <file>    String dictionary for this run (JSON array of names)");
    println!("    -w, --world          Position = parent pivot + Position instead of own pivot");
    println!("    -v, --verbose        Debug logging");
    println!("    -vv, --trace         Trace logging");
    println!("    -q, --quiet          Errors only");
    println!("    -V, --version        Print version");
    println!();
    println!("ENVIRONMENT:");
    println!("    AARON_DICTIONARY     String dictionary for this run (not saved)");
    println!("    RUST_LOG             Log filter, overrides -v/-q");
}

fn require_arg<'a>(args: &[&'a str], index: usize, usage: &str) -> &'a str {
    match args.get(index) {
        Some(arg) => *arg,
        None => {
            eprintln!("Error: missing argument");
            eprintln!("Usage: {}", usage);
            std::process::exit(1);
        }
    }
}

fn fail(msg: &str) -> ! {
    eprintln!("Error: {}", msg);
    std::process::exit(1);
}

fn parse_id(text: &str) -> Option<u32> {
    match text.strip_prefix("0x") {
        Some(hex) => u32::from_str_radix(hex, 16).ok(),
        None => text.parse().ok(),
    }
}

fn load(session: &mut Session, path: &str) -> aaron::session::LoadedCar {
    match session.load(path) {
        Ok(loaded) => loaded,
        Err(e) => fail(&format!("failed to load {}: {}", path, e)),
    }
}

fn cmd_info(session: &mut Session, path: &str) {
    let loaded = load(session, path);
    let doc = &loaded.document;
    let resolver = session.resolver();

    println!("File:          {}", path);
    println!("Car type:      {}", doc.car_type_name);
    println!("Base model:    {}", doc.base_model_name);
    println!("Manufacturer:  {}", doc.manufacturer_name);
    println!("Usage:         {:?}", doc.usage_type);
    println!("Base paint:    {}", doc.default_base_paint_name(resolver));
    println!("Skinnable:     {}", doc.skinnable);
    println!("Default skin:  {}", doc.default_skin_number);
    match doc.spoiler_type() {
        Some(spoiler) => println!("Spoiler:       {:?}", spoiler),
        None => println!("Spoiler:       undefined"),
    }
    println!();
    println!("Root bounds:   {}", loaded.forest.len());
    println!("Total bounds:  {}", forest_len(&loaded.forest));
    println!(
        "Point clouds:  {}",
        doc.bounds_pack.as_ref().map_or(0, |p| p.point_clouds.len())
    );
}

fn cmd_tree(session: &mut Session, path: &str) {
    let loaded = load(session, path);
    println!("{}", path);
    for root in &loaded.forest {
        root.walk(&mut |node: &BoundNode, depth: usize| print_bound(node, depth));
    }
}

fn print_bound(node: &BoundNode, depth: usize) {
    let indent = "  ".repeat(depth + 1);
    let p = node.position;
    let h = node.half_dimensions;
    println!(
        "{}{} [{}] pos=({:.3}, {:.3}, {:.3}) half=({:.3}, {:.3}, {:.3}) surface={}",
        indent, node.bound_name, node.shape, p.x, p.y, p.z, h.x, h.y, h.z, node.surface
    );
    let flags: Vec<_> = node.flags.engine_names().collect();
    if !flags.is_empty() {
        println!("{}  flags: {}", indent, flags.join(", "));
    }
    if let Some(cloud) = &node.point_cloud {
        match cloud.bounds() {
            Some((lo, hi)) => println!(
                "{}  point cloud: {} vertices, min=({:.3}, {:.3}, {:.3}) max=({:.3}, {:.3}, {:.3})",
                indent, cloud.len(), lo.x, lo.y, lo.z, hi.x, hi.y, hi.z
            ),
            None => println!("{}  point cloud: empty", indent),
        }
    }
}

fn cmd_resave(session: &mut Session, path: &str, out: Option<&str>) {
    let loaded = load(session, path);
    let out = out
        .map(PathBuf::from)
        .unwrap_or_else(|| session.save_path_for(Path::new(path)));
    if let Err(e) = session.save(&loaded.document, &loaded.forest, &out) {
        fail(&format!("failed to save {}: {}", out.display(), e));
    }
    println!("Saved {} bounds to {}", forest_len(&loaded.forest), out.display());
}
