pub mod pdftoppm;
