mod drag_tests;
mod drop_target_tests;
mod fractions_tests;
mod tree_tests;
