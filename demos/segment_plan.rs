use voxweave::{NarrationPlan, Token, segment, tempo_rate_string};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let s = include_str!("../tests/data/sample_plan.json");
    let plan = NarrationPlan::from_reader(s.as_bytes())?;
    plan.validate()?;

    println!(
        "plan: {} fragments, voice {}, rate {}",
        plan.fragments.len(),
        plan.config.voice,
        tempo_rate_string(plan.config.tempo_percent)
    );

    for (i, text) in plan.fragments.iter().enumerate() {
        let mut words = 0usize;
        let mut scripted_pause_ms = 0u64;
        for token in segment(text) {
            match token {
                Token::Literal(chunk) => words += chunk.split_whitespace().count(),
                Token::Pause(seconds) => scripted_pause_ms += seconds.saturating_mul(1000),
            }
        }
        println!("fragment {}: {words} words, {scripted_pause_ms} ms scripted pause", i + 1);
    }

    Ok(())
}
