use criterion::{Criterion, criterion_group, criterion_main};
use domain::{Money, Order, OrderId, OrderItem, Repository};
use repository::InMemoryOrderRepository;

fn make_order(id: &str, items: usize) -> Order {
    let items = (0..items)
        .map(|i| {
            OrderItem::new(
                format!("{id}-item-{i}"),
                format!("Item {i}"),
                Money::from_cents(1_000 + i as i64),
                format!("p{i}"),
                1,
            )
            .unwrap()
        })
        .collect();
    Order::new(id, "c1", items).unwrap()
}

fn bench_create_order(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();

    c.bench_function("repository/create_order_10_items", |b| {
        b.iter(|| {
            rt.block_on(async {
                let repo = InMemoryOrderRepository::new();
                repo.create(&make_order("o1", 10)).await.unwrap();
            });
        });
    });
}

fn bench_find_order(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let repo = InMemoryOrderRepository::new();

    rt.block_on(async {
        for i in 0..100 {
            repo.create(&make_order(&format!("o{i}"), 10)).await.unwrap();
        }
    });

    let id = OrderId::new("o50");
    c.bench_function("repository/find_order", |b| {
        b.iter(|| {
            rt.block_on(async {
                let order = repo.find(&id).await.unwrap();
                assert_eq!(order.item_count(), 10);
            });
        });
    });
}

fn bench_find_all_orders(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let repo = InMemoryOrderRepository::new();

    rt.block_on(async {
        for i in 0..100 {
            repo.create(&make_order(&format!("o{i}"), 5)).await.unwrap();
        }
    });

    c.bench_function("repository/find_all_100_orders", |b| {
        b.iter(|| {
            rt.block_on(async {
                let orders = repo.find_all().await.unwrap();
                assert_eq!(orders.len(), 100);
            });
        });
    });
}

criterion_group!(
    benches,
    bench_create_order,
    bench_find_order,
    bench_find_all_orders
);
criterion_main!(benches);
