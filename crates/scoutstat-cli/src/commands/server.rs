use scoutstat_server::Snapshot;

pub fn run(source: &super::SnapshotSource<'_>, host: &str, port: u16, max_combinations: u128) {
    let loaded = super::load_snapshot_or_exit(source);
    let snapshot = Snapshot::new(loaded.records, &loaded.ratings, loaded.config, max_combinations);

    let base = format!("http://{host}:{port}");
    println!("scoutstat server v{}", scoutstat_core::VERSION);
    println!("   {base}");
    println!(
        "   {} teams, {} records from {}",
        snapshot.team_count(),
        snapshot.record_count(),
        source.records_path
    );
    println!();
    println!("   Endpoints:");
    println!("     GET  /                 API index (try: curl {base})");
    println!("     GET  /health           Health check");
    println!("     GET  /stats            Per-team statistics");
    println!("     GET  /stats/{{team}}     One team's statistics");
    println!("     GET  /percentiles      Cross-team percentile bands");
    println!("     GET  /rank             ?metric=total_points&kind=mean");
    println!("     GET  /predict          ?a=254,1678&b=971");
    println!("     POST /ttest            {{\"first\": [..], \"second\": [..]}}");
    println!("   Max combinations per alliance: {max_combinations}");
    println!();

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to start runtime: {e}");
            std::process::exit(1);
        }
    };
    if let Err(e) = rt.block_on(scoutstat_server::run_server(snapshot, host, port)) {
        eprintln!("Server error: {e}");
        std::process::exit(1);
    }
}
