use criterion::{black_box, criterion_group, criterion_main, Criterion};
use holstein_diagmc::{
    diagram::Diagram,
    model::ModelParameters,
    rng::rng_from_seed,
    simulation::{run_production, run_thermalization, DiagrammaticMonteCarlo},
    statistics::{Estimates, PhononHistogram},
};

const SEED: u64 = 0x45_78_93_f4_4a_b0_67_f0;

fn thermalized(
    parameters: ModelParameters,
) -> (Diagram, DiagrammaticMonteCarlo<rand_xoshiro::Xoshiro256PlusPlus>) {
    let mut mc = DiagrammaticMonteCarlo::new(parameters, rng_from_seed(SEED));
    let diagram = run_thermalization(Diagram::new(parameters.time()), &mut mc, 5_000).unwrap();
    (diagram, mc)
}

fn criterion_benchmark(c: &mut Criterion) {
    let parameters = ModelParameters::new(0.3_f64, 1_f64, 50_f64).unwrap();
    let (diagram, mut mc) = thermalized(parameters);

    c.bench_function("mc step g 0.3 tau 50", |b| {
        let mut diagram = diagram.clone();
        b.iter(|| mc.step(black_box(&mut diagram)))
    });

    let strong = ModelParameters::new(2_f64, 1_f64, 50_f64).unwrap();
    let (diagram_strong, mut mc_strong) = thermalized(strong);
    c.bench_function("mc step g 2 tau 50", |b| {
        let mut diagram = diagram_strong.clone();
        b.iter(|| mc_strong.step(black_box(&mut diagram)))
    });

    let (_, statistics) =
        run_production(diagram, &mut mc, 100_000, parameters.frequency()).unwrap();
    c.bench_function("estimates 100 000 steps", |b| {
        b.iter(|| Estimates::from_statistics(black_box(&statistics), &parameters))
    });
    c.bench_function("histogram 100 000 steps", |b| {
        b.iter(|| PhononHistogram::from_orders(black_box(statistics.order_sequence())))
    });
    let histogram = PhononHistogram::from_orders(statistics.order_sequence());
    c.bench_function("poisson fit", |b| b.iter(|| black_box(&histogram).fit_poisson()));
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
