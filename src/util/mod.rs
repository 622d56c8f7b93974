pub mod test_surfels;
