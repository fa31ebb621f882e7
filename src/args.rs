use clap::Parser;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Camera Index (default 0)
    #[arg(short, long, default_value_t = 0)]
    pub cam_index: u32,

    /// Run against a generated test spectrum instead of a camera
    #[arg(long)]
    pub synthetic: bool,

    /// Override the render loop period in milliseconds
    #[arg(long)]
    pub tick_ms: Option<u64>,

    /// List available cameras
    #[arg(long)]
    pub list: bool,
}
