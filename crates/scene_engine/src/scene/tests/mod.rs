//! End-to-end tests over a complete scene document

mod board_scene;
