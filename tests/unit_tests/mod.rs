mod geometry;
mod grid;
mod norms;
