use std::env;
use std::fs;
use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use epub_pager::{
    Book, EpubContainer, JsonFileStore, Navigator, NavigatorBuilder, PositionStore, ReaderError,
    TapEvent, TapOutcome, TextSurface,
};
use chrono::Local;
use serde_json::{json, Value};

const DEFAULT_STORE: &str = ".epub-pager.json";

type TerminalNavigator = Navigator<JsonFileStore, TextSurface>;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    match run(env::args().collect()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(msg) => {
            eprintln!("error: {}", msg);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Vec<String>) -> Result<(), String> {
    let mut rest = args.into_iter().skip(1).collect::<Vec<_>>();
    let pretty = pop_flag(&mut rest, "--pretty");
    let store_path = pop_value(&mut rest, "--store")?.unwrap_or_else(|| DEFAULT_STORE.to_string());

    if rest.is_empty() || rest[0] == "--help" || rest[0] == "-h" {
        print_help();
        return Ok(());
    }

    let cmd = rest.remove(0);
    match cmd.as_str() {
        "info" => {
            let path = first_arg(&rest, "info requires <epub_path>")?;
            let book = Book::open(&path, &EpubContainer::new()).map_err(display_err)?;
            let spine = book
                .chapters()
                .map(|chapter| {
                    json!({
                        "index": chapter.index(),
                        "idref": chapter.idref(),
                        "bytes": chapter.byte_size(),
                    })
                })
                .collect::<Vec<_>>();
            let output = json!({
                "epub": path,
                "count": spine.len(),
                "total_bytes": book.total_bytes(),
                "spine": spine,
            });
            print_json(&output, pretty)?;
        }
        "position" => {
            let path = first_arg(&rest, "position requires <epub_path>")?;
            let store = JsonFileStore::open(&store_path).map_err(display_err)?;
            let book_id = book_identity(&path);
            let record = store.load(&book_id).map_err(display_err)?;
            let output = json!({
                "epub": book_id,
                "store": store_path,
                "position": record,
            });
            print_json(&output, pretty)?;
        }
        "read" => {
            let width = parse_number(pop_value(&mut rest, "--width")?, "--width", 72)?;
            let height = parse_number(pop_value(&mut rest, "--height")?, "--height", 20)?;
            let overlap = parse_number(pop_value(&mut rest, "--overlap")?, "--overlap", 2)?;
            let store = JsonFileStore::open(&store_path).map_err(display_err)?;
            let path = match rest.first() {
                Some(path) => path.clone(),
                None => store
                    .last_opened()
                    .map_err(display_err)?
                    .ok_or_else(|| "read requires <epub_path> (no book opened yet)".to_string())?,
            };
            read_loop(&path, store, width as usize, height, overlap)?;
        }
        _ => {
            return Err(format!(
                "unknown command '{}'; run `epub-pager --help` for usage",
                cmd
            ));
        }
    }

    Ok(())
}

fn read_loop(
    path: &str,
    store: JsonFileStore,
    width: usize,
    height: u32,
    overlap: u32,
) -> Result<(), String> {
    let book = Book::open(path, &EpubContainer::new()).map_err(|err| {
        log::error!("Load failed for '{}': {}", path, err);
        display_err(err)
    })?;
    // surface units are lines here, so the overlap is a line count
    let mut nav = NavigatorBuilder::new()
        .plain_content()
        .page_overlap(overlap)
        .open(book, book_identity(path), store, TextSurface::new(width));
    settle(&mut nav);
    draw(&nav, height);

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line.map_err(|e| e.to_string())?;
        let fraction = match line.trim() {
            "q" | "quit" => break,
            "" | "f" => 0.9,
            "b" => 0.1,
            "m" => 0.5,
            other => match other.strip_prefix("tap ").map(|v| v.trim().parse::<f32>()) {
                Some(Ok(v)) => v,
                _ => {
                    eprintln!("commands: f (or enter), b, m, tap <0..1>, q");
                    continue;
                }
            },
        };

        let surface = nav.surface();
        let columns = surface.width() as f32;
        let event = TapEvent::new(fraction * columns, columns, height, surface.content_height())
            .with_edges(surface.at_top(), surface.at_bottom(height));
        if let TapOutcome::ChapterChanged { .. } = nav.on_tap(event) {
            settle(&mut nav);
        }
        draw(&nav, height);
    }

    Ok(())
}

/// Layout is synchronous here, so the restore can run right away.
fn settle(nav: &mut TerminalNavigator) {
    let height = nav.surface().content_height();
    nav.restore_pending_offset(height);
}

fn draw(nav: &TerminalNavigator, height: u32) {
    let mut out = io::stdout().lock();
    let rule = "-".repeat(nav.surface().width());
    let _ = writeln!(out, "{}", rule);
    if nav.chrome_visible() {
        let position = nav.position();
        let idref = nav
            .book()
            .chapter(position.chapter_index)
            .map(|c| c.idref().to_string())
            .unwrap_or_default();
        let _ = writeln!(
            out,
            "[{}] chapter {}/{} ({})",
            nav.book_id(),
            position.chapter_index + 1,
            nav.book().len(),
            idref
        );
        let _ = writeln!(out, "{}", rule);
    }
    for line in nav.surface().visible(height) {
        let _ = writeln!(out, "{}", line);
    }
    let _ = writeln!(out, "{}", rule);
    let _ = writeln!(out, "{}", nav.status_line(Local::now().time(), None));
    let _ = out.flush();
}

fn book_identity(path: &str) -> String {
    fs::canonicalize(path)
        .map(|p| p.display().to_string())
        .unwrap_or_else(|_| path.to_string())
}

fn print_json(value: &Value, pretty: bool) -> Result<(), String> {
    let rendered = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
    .map_err(|e| e.to_string())?;
    println!("{}", rendered);
    Ok(())
}

fn parse_number(value: Option<String>, flag: &str, default: u32) -> Result<u32, String> {
    match value {
        Some(v) => v
            .parse::<u32>()
            .map_err(|_| format!("invalid {} value '{}'", flag, v)),
        None => Ok(default),
    }
}

fn first_arg(args: &[String], msg: &str) -> Result<String, String> {
    args.first().cloned().ok_or_else(|| msg.to_string())
}

fn pop_flag(args: &mut Vec<String>, flag: &str) -> bool {
    if let Some(pos) = args.iter().position(|a| a == flag) {
        args.remove(pos);
        true
    } else {
        false
    }
}

fn pop_value(args: &mut Vec<String>, flag: &str) -> Result<Option<String>, String> {
    let Some(pos) = args.iter().position(|a| a == flag) else {
        return Ok(None);
    };
    args.remove(pos);
    if pos < args.len() {
        Ok(Some(args.remove(pos)))
    } else {
        Err(format!("{} requires a value", flag))
    }
}

fn display_err(err: ReaderError) -> String {
    err.to_string()
}

fn print_help() {
    let help = r#"epub-pager - page through EPUB files in the terminal

USAGE:
  epub-pager [--pretty] [--store <path>] <command> [args...]

COMMANDS:
  info <epub_path>
  position <epub_path>
  read [<epub_path>] [--width <cols>] [--height <lines>] [--overlap <lines>]

READING:
  f or enter   next page
  b            previous page
  m            toggle chapter header
  tap <0..1>   tap at a fraction of the width
  q            quit

NOTES:
  - `read` without a path reopens the last book from the store.
  - Positions are saved after every page turn (default store: .epub-pager.json).
"#;
    println!("{}", help);
}
