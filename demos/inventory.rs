use sovran_typetable::{HeterogeneousTable, TableError};
use tracing::Level;

#[derive(Debug, Default)]
struct Stock {
    on_hand: u32,
    reserved: u32,
}

#[derive(Debug)]
struct Price {
    cents: u64,
}

fn main() -> Result<(), TableError> {
    tracing_subscriber::fmt().with_max_level(Level::TRACE).init();

    // Every item is identified by its SKU
    let mut inventory = HeterogeneousTable::<&'static str>::new();

    inventory.add_row("sku-001", "Espresso beans".to_string());
    inventory.add_row("sku-001", Price { cents: 1899 });
    inventory.add_default_row::<Stock>("sku-001").on_hand = 40;

    inventory.add_row("sku-002", "Milk frother".to_string());
    inventory.add_row("sku-002", Price { cents: 4500 });
    inventory.add_default_row::<Stock>("sku-002").on_hand = 3;

    // Reserve some stock
    inventory.get_row_mut::<Stock>(&"sku-001").reserved += 5;

    let mut units = 0;
    inventory.query::<Price, _>(|sku, price| {
        println!("{}: {} cents", sku, price.cents);
    });
    inventory.query::<Stock, _>(|sku, stock| {
        println!("{}: {} on hand, {} reserved", sku, stock.on_hand, stock.reserved);
        units += stock.on_hand;
    });
    println!("Units on hand: {}", units);

    // Adding a second name for the same SKU is reported, not overwritten
    match inventory.try_add_row("sku-001", "Decaf beans".to_string()) {
        Ok(_) => println!("This shouldn't happen - sku-001 already has a name"),
        Err(e) => println!("Rejected: {}", e),
    }

    // Discontinue an item's price without touching its other rows
    inventory.remove_row::<Price>(&"sku-002");
    println!(
        "sku-002 has price: {}, has name: {}",
        inventory.has_row::<Price>(&"sku-002"),
        inventory.has_row::<String>(&"sku-002")
    );

    let name = inventory.try_get_row::<String>(&"sku-001")?;
    println!("sku-001 is {}", name);
    println!("{:?}", inventory);

    Ok(())
}
