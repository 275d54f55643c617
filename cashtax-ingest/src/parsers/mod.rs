pub mod cashapp;
