pub mod text_diff;
