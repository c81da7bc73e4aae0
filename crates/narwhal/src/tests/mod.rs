mod model;
mod sizing;
mod skeleton;
mod snap;
