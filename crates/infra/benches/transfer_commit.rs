use std::hint::black_box;
use std::sync::Arc;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};

use depot_core::{Entity, ItemId, LocationId, WarehouseId};
use depot_infra::{InMemoryPlaceDirectory, LedgerConfig, LedgerServices, Location};
use depot_inventory::{InventoryDraft, LocationAmount};
use depot_transfers::{PlaceRef, TransferDraft, TransferLine};

type Services = LedgerServices<Arc<InMemoryPlaceDirectory>>;

fn setup(items: usize) -> Services {
    let dir = Arc::new(InMemoryPlaceDirectory::new());
    let wh = WarehouseId::new(1);
    dir.add_location(Location::new(wh, "A-01", "Source")).unwrap();
    dir.add_location(Location::new(wh, "A-02", "Destination")).unwrap();

    let services = LedgerServices::new(LedgerConfig::default(), dir);
    for n in 0..items {
        services
            .inventory
            .add(InventoryDraft {
                item_id: ItemId::new(format!("P{n:06}")),
                locations: vec![LocationAmount::new(LocationId::new(1), 1_000_000)],
                total_on_hand: 1_000_000,
                ..InventoryDraft::default()
            })
            .unwrap();
    }
    services
}

fn transfer_draft(lines: usize) -> TransferDraft {
    (0..lines).fold(
        TransferDraft::new(LocationId::new(2)).with_from(PlaceRef::Location(LocationId::new(1))),
        |draft, n| draft.with_line(TransferLine::new(format!("P{n:06}"), 1)),
    )
}

/// Create-and-commit cost as the number of lines per transfer grows.
fn bench_commit(c: &mut Criterion) {
    let mut group = c.benchmark_group("transfer_commit");

    for lines in [1usize, 10, 100] {
        group.throughput(Throughput::Elements(lines as u64));
        group.bench_with_input(BenchmarkId::from_parameter(lines), &lines, |b, &lines| {
            let services = setup(lines);
            b.iter(|| {
                let order = services
                    .transfers
                    .create(Some(transfer_draft(lines)))
                    .unwrap();
                black_box(services.transfers.commit(order.id()).unwrap())
            });
        });
    }

    group.finish();
}

/// Single-location adjustment against a growing ledger.
fn bench_adjust(c: &mut Criterion) {
    let mut group = c.benchmark_group("adjust_on_hand");

    for records in [10usize, 1_000] {
        group.bench_with_input(BenchmarkId::from_parameter(records), &records, |b, &records| {
            let services = setup(records);
            let item = ItemId::new(format!("P{:06}", records - 1));
            b.iter(|| {
                black_box(
                    services
                        .inventory
                        .adjust_on_hand(&item, LocationId::new(1), -1)
                        .unwrap(),
                )
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_commit, bench_adjust);
criterion_main!(benches);
