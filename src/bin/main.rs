use clap::{Parser, ValueEnum};
use cordyceps_avl::{AvlSet, Order};

/// Builds a tree from the given keys and prints a traversal, a search result or its height.
#[derive(Debug, Parser)]
#[command(name = "avl", version)]
struct Cli {
    /// Keys to insert, in order. Keys are non-negative, so -1 can mark a missed search.
    keys: Vec<u64>,

    /// Insert and remove as a plain binary search tree, without rebalancing.
    #[arg(long)]
    plain: bool,

    /// Remove this key after inserting, then print the traversal.
    #[arg(long)]
    remove: Option<u64>,

    /// Print this key if it is present, or -1 if it is not.
    #[arg(long, conflicts_with = "remove")]
    search: Option<u64>,

    /// Print the height of the tree instead of a traversal.
    #[arg(long, conflicts_with_all = ["remove", "search"])]
    height: bool,

    /// Traversal order to print.
    #[arg(long, value_enum, default_value_t = CliOrder::Pre)]
    order: CliOrder,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum CliOrder {
    Pre,
    In,
    Post,
    Bf,
}

impl From<CliOrder> for Order {
    fn from(order: CliOrder) -> Order {
        match order {
            CliOrder::Pre => Order::Pre,
            CliOrder::In => Order::In,
            CliOrder::Post => Order::Post,
            CliOrder::Bf => Order::BreadthFirst,
        }
    }
}

fn search_result(set: &AvlSet<u64>, key: u64) -> String {
    match set.search(&key) {
        Some(node) => node.key().to_string(),
        None => "-1".to_string(),
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    log::debug!("{cli:?}");

    let mut set = AvlSet::new();
    for &key in &cli.keys {
        if cli.plain {
            set.insert_unbalanced(key);
        } else {
            set.insert(key);
        }
    }

    if let Some(key) = cli.search {
        println!("{}", search_result(&set, key));
        return;
    }

    if cli.height {
        println!("{}", set.height(set.root()));
        return;
    }

    if let Some(key) = cli.remove {
        let removed = if cli.plain {
            set.remove_unbalanced(&key)
        } else {
            set.remove(&key)
        };
        log::info!("remove {key}: {}", if removed { "removed" } else { "not present" });
    }

    let keys: Vec<String> = set
        .traverse(cli.order.into())
        .map(|key| key.to_string())
        .collect();
    println!("{}", keys.join(" "));
}
