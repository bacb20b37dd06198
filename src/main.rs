use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use coelute::cli::{Cli, Commands, QuantifyArgs, ScoreArgs};
use coelute::ctx::{Ctx, ScoreParams};
use coelute::io;
use coelute::pipeline::stage0_scaffold::Stage0Scaffold;
use coelute::pipeline::stage1_input::Stage1Input;
use coelute::pipeline::stage2_monomer::Stage2Monomer;
use coelute::pipeline::stage3_features::Stage3Features;
use coelute::pipeline::stage4_significance::Stage4Significance;
use coelute::pipeline::stage5_quantify::Stage5Quantify;
use coelute::pipeline::stage6_differential::Stage6Differential;
use coelute::pipeline::stage7_output::Stage7Output;
use coelute::pipeline::Pipeline;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Score(args) => {
            let mut ctx = score_ctx(&args)?;
            let pipeline = Pipeline::new(vec![
                Box::new(Stage0Scaffold::new()),
                Box::new(Stage1Input::new()),
                Box::new(Stage2Monomer::new()),
                Box::new(Stage3Features::new()),
                Box::new(Stage4Significance::new()),
                Box::new(Stage7Output::new()),
            ]);
            pipeline.run(&mut ctx)?;
            print_summary(&ctx);
        }
        Commands::Quantify(args) => {
            let mut ctx = quantify_ctx(&args);
            let pipeline = Pipeline::new(vec![
                Box::new(Stage0Scaffold::new()),
                Box::new(Stage1Input::new()),
                Box::new(Stage5Quantify::new()),
                Box::new(Stage6Differential::new()),
                Box::new(Stage7Output::new()),
            ]);
            pipeline.run(&mut ctx)?;
            print_summary(&ctx);
        }
        Commands::Run(args) => {
            let mut ctx = score_ctx(&args)?;
            let pipeline = Pipeline::new(vec![
                Box::new(Stage0Scaffold::new()),
                Box::new(Stage1Input::new()),
                Box::new(Stage2Monomer::new()),
                Box::new(Stage3Features::new()),
                Box::new(Stage4Significance::new()),
                Box::new(Stage5Quantify::new()),
                Box::new(Stage6Differential::new()),
                Box::new(Stage7Output::new()),
            ]);
            pipeline.run(&mut ctx)?;
            print_summary(&ctx);
        }
    }

    Ok(())
}

fn score_ctx(args: &ScoreArgs) -> Result<Ctx> {
    let params = args.params();
    params.validate()?;
    let mut ctx = Ctx::new(
        args.input.clone(),
        args.out.clone(),
        params,
        env!("CARGO_PKG_VERSION"),
    );
    ctx.threads = args.threads;
    Ok(ctx)
}

fn quantify_ctx(args: &QuantifyArgs) -> Ctx {
    let mut ctx = Ctx::new(
        args.input.clone(),
        args.out.clone(),
        ScoreParams::default(),
        env!("CARGO_PKG_VERSION"),
    );
    ctx.load_results = true;
    ctx
}

fn print_summary(ctx: &Ctx) {
    print!("{}", io::summary::format_summary(ctx));
    if !ctx.warnings.is_empty() {
        println!("warnings:");
        for warning in &ctx.warnings {
            println!("- {}", warning);
        }
    }
}
