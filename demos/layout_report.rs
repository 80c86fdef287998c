use clap::Parser;
use folio::{DocumentLayouter, FolioError, NodeId};
use std::env;
use std::fs;

/// Lays out a JSON document and prints where every named node landed.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// JSON document source
    input: String,

    /// Optional JSON layout configuration
    #[arg(long)]
    config: Option<String>,

    /// Print every arranged node, not only named ones
    #[arg(long, default_value_t = false)]
    all: bool,
}

fn main() -> Result<(), FolioError> {
    if env::var("RUST_LOG").is_err() {
        unsafe {
            env::set_var("RUST_LOG", "folio=info");
        }
    }
    env_logger::init();

    let args = Args::parse();

    let layouter = match &args.config {
        Some(path) => DocumentLayouter::from_config_json(&fs::read_to_string(path)?)?,
        None => DocumentLayouter::default(),
    };
    let (tree, layout) = layouter.layout_file(&args.input)?;

    println!("{} pages", layout.page_count());
    for page in &layout.pages {
        println!(
            "  page {} '{}' ({}x{}pt) body {:?}",
            page.index, page.label, page.size.width, page.size.height, page.body_rect
        );
    }

    for index in 0..tree.len() {
        let id = NodeId::new(index);
        let node = tree.node(id);
        if node.name.is_none() && !args.all {
            continue;
        }
        for arrangement in node.arrangements() {
            println!(
                "{:>6} {:<10} {:<16} page {:>3} {:?}{}",
                id.to_string(),
                node.kind.as_str(),
                node.name.as_deref().unwrap_or("-"),
                arrangement.page_index,
                arrangement.border_rect,
                if arrangement.display { "" } else { " (hidden)" }
            );
        }
    }
    Ok(())
}
