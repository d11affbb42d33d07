use std::time::Instant;

use clap::Parser;
use clap::ValueEnum;
use robin_table::HasherKind;
use robin_table::Table;
use robin_table::TableConfig;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Primitive {
    Sip,
    Highway,
    T1,
    Spooky,
}

impl Primitive {
    fn kind(self) -> Option<HasherKind> {
        HasherKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.name().starts_with(self.prefix()))
    }

    fn prefix(self) -> &'static str {
        match self {
            Primitive::Sip => "sip",
            Primitive::Highway => "highway",
            Primitive::T1 => "t1",
            Primitive::Spooky => "spooky",
        }
    }
}

#[derive(Parser, Debug)]
struct Args {
    #[arg(short = 'n', long = "count", default_value_t = 1_000_000)]
    count: usize,

    #[arg(short = 'p', long = "primitive", value_enum, default_value_t = Primitive::Sip)]
    primitive: Primitive,

    #[arg(short = 's', long = "initial_size", default_value_t = 50)]
    initial_size: usize,
}

#[derive(Debug)]
struct Carrier {
    val: usize,
}

fn main() -> robin_table::Result<()> {
    let args = Args::parse();

    let Some(kind) = args.primitive.kind() else {
        eprintln!("{:?} is not compiled into this build", args.primitive);
        std::process::exit(2);
    };

    let config = TableConfig::default().initial_size(args.initial_size);
    let hasher = robin_table::AnyHasher::new(kind)?;
    let mut table = Table::with_config(config, hasher)?;

    println!("Adding {} keys with {kind}...", args.count);
    let start = Instant::now();
    for i in 0..args.count {
        table.add(i.to_string(), Carrier { val: i });
    }
    println!("Add time: {:?}", start.elapsed());
    println!(
        "Length: {}, Capacity: {}, Load: {}",
        table.length(),
        table.capacity(),
        table.len()
    );

    println!("Fetching...");
    let start = Instant::now();
    let mut misses = 0;
    let mut mismatches = 0;
    for i in 0..args.count {
        match table.get(i.to_string()) {
            Some(carrier) if carrier.val != i => mismatches += 1,
            Some(_) => {}
            None => misses += 1,
        }
    }
    println!("Fetch time: {:?}", start.elapsed());
    println!("Misses: {misses}, digest collisions: {mismatches}");

    table.print_probe_histogram();
    table.debug_stats().print();

    Ok(())
}
