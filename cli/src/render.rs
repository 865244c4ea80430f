use maze::{MazeMaker, MazeSolver, Pick, Shade, Tile};

pub const CURSOR: &str = "@@";
pub const VISITED: &str = "··";
pub const PATH: &str = "<>";
pub const START: &str = "SS";
pub const END: &str = "EE";

/// The grid being carved, with the cursor highlighted.
pub fn generation<P: Pick>(maker: &MazeMaker<P>) -> String {
    let cursor = maker.cursor();
    maker.grid().draw(|cell, tile| {
        if Some(cell) == cursor {
            CURSOR
        } else {
            tile.glyph()
        }
    })
}

pub fn solution(solver: &MazeSolver<'_>) -> String {
    solver.grid().draw(|cell, _| match solver.shade(cell) {
        Shade::Start => START,
        Shade::End => END,
        Shade::Path => PATH,
        Shade::Visited => VISITED,
        Shade::Wall => Tile::Wall.glyph(),
        Shade::Open => Tile::Open.glyph(),
    })
}
