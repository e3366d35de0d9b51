//! Main entry point for the jarlens CLI application.
//!
//! Prints the package tree of an archive, its raw entry list or the text of
//! a single entry. Archives may be local files, HTTP URLs or entries of other
//! archives.

use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use jarlens::{
    ArchiveRegistry, Cli, Content, DefaultFileAccess, Folder, JavaPackage, Node, RegistryConfig,
    ZipArchiveReader,
};

const INDENT: &str = "  ";

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_tracing(&cli);
    debug!("Parsed CLI arguments: {cli:?}");

    let registry = ArchiveRegistry::new(
        Arc::new(DefaultFileAccess),
        Arc::new(ZipArchiveReader),
        RegistryConfig::from(&cli),
    );
    let address = cli.address();

    if cli.pipe {
        let text = registry.read_entry_text(&address).await?;
        let mut stdout = tokio::io::stdout();
        stdout.write_all(text.as_bytes()).await?;
        stdout.flush().await?;
        return Ok(());
    }

    let handle = registry.resolve_content(&address).await?;
    if cli.list {
        for entry in handle.entries() {
            println!("{}", entry.file_name);
        }
        return Ok(());
    }

    print_content(handle.content());
    if !cli.is_quiet() {
        for skipped in handle.content().skipped() {
            eprintln!("skipped: {} ({})", skipped.path, skipped.reason);
        }
    }
    Ok(())
}

fn setup_tracing(cli: &Cli) {
    if let Some(level) = cli.log_level.to_tracing_level() {
        tracing_subscriber::fmt()
            .with_max_level(level)
            .with_writer(std::io::stderr)
            .without_time()
            .compact()
            .init();
    }
}

/// Packages first, then entries outside of any package.
fn print_content(content: &Content) {
    println!("{}", content.address());
    for package in content.sorted_packages() {
        print_package(package, 1);
    }
    for node in content.sorted_files() {
        print_node(node, 1);
    }
}

fn print_package(package: &JavaPackage, depth: usize) {
    let name = if package.name().is_empty() {
        "(default package)"
    } else {
        package.name()
    };
    println!("{}{}", INDENT.repeat(depth), name);
    for class in package.sorted_classes() {
        println!("{}{}", INDENT.repeat(depth + 1), class.name());
    }
    for node in package.sorted_files() {
        print_node(node, depth + 1);
    }
}

fn print_folder(folder: &Folder, depth: usize) {
    println!("{}{}/", INDENT.repeat(depth), folder.name());
    for node in folder.sorted_files() {
        print_node(node, depth + 1);
    }
}

fn print_node(node: &Node, depth: usize) {
    match node {
        Node::Folder(folder) => print_folder(folder, depth),
        Node::JavaPackage(package) => print_package(package, depth),
        Node::File(_) | Node::JavaClass(_) => println!("{}{}", INDENT.repeat(depth), node.name()),
    }
}
