//! Bloat the standard 4-sphere with scripted 2-4 moves, then simplify it.
//!
//! Prints the input signature and size, every improving epoch, and the final
//! report. Run with `cargo run -p updown --example bloat_and_simplify`.

use updown::prelude::*;
use updown::tri4::special::{boundary_of_simplex, subdivided};

fn main() -> Result<(), SearchError> {
    let picks: Vec<usize> = (0..12).map(|i| i * 5 + 1).collect();
    let bloated = subdivided(boundary_of_simplex(), &picks);
    let sig = bloated.signature();
    let counts = bloated.counts();
    println!(
        "input: {} pentachora, {} edges, euler {}",
        counts.pentachora,
        counts.edges,
        counts.euler_characteristic()
    );
    println!("{sig}");

    let cfg = SearchCfg {
        height: 3,
        width: 10,
        epochs: 4,
        ..SearchCfg::default()
    };
    let summary = simplify::<Triangulation4, _>(&sig, &cfg, |report| println!("{report}"))?;
    println!("{}", summary.final_report);
    for kind in MoveKind::ALL {
        println!("  {kind}: {}", summary.final_report.tally.get(kind));
    }
    Ok(())
}
