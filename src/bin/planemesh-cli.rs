use std::io::{self, Read};

use planemesh::loader::{MeshDocument, MeshOutput};

/// Reads a triangulation document from stdin and writes the resulting
/// mesh as JSON to stdout. A failed call prints one descriptive error to
/// stderr and exits nonzero.
fn main() {
    if let Err(err) = run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut input = String::new();
    io::stdin().read_to_string(&mut input)?;

    let document = MeshDocument::from_json(&input)?;
    let mesh = document.into_builder()?.build()?.triangulate()?;

    println!("{}", MeshOutput::from_mesh(&mesh).to_json());
    mesh.release();
    Ok(())
}
