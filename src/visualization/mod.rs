pub mod frame_plot;
