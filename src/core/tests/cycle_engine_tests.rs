// Tests for CycleEngine functionality
#[cfg(test)]
mod tests {
    use crate::core::{
        components::{Factory, ProductionDelay, Warehouse},
        errors::WarehouseError,
        event::SimEvent,
        event_sink::RecordingSink,
        execution::cycle_engine::CycleEngine,
    };
    use std::sync::Arc;
    use std::time::{Duration, Instant};

    fn build_engine(
        capacity: u64,
        rates: &[u64],
        delay: ProductionDelay,
    ) -> (CycleEngine, Arc<Warehouse>, Arc<RecordingSink>) {
        let sink = Arc::new(RecordingSink::new());
        let warehouse = Arc::new(Warehouse::new(capacity).with_sink(sink.clone()));
        let factories = rates
            .iter()
            .enumerate()
            .map(|(i, &rate)| {
                Factory::new(crate::core::types::factory_name(i), rate, warehouse.clone())
                    .with_production_delay(delay)
            })
            .collect();
        let engine = CycleEngine::new(factories, warehouse.clone(), None).unwrap();
        (engine, warehouse, sink)
    }

    #[test]
    fn test_run_hour_joins_all_factories() {
        let (mut engine, warehouse, _) =
            build_engine(10_000, &[50, 55, 60], ProductionDelay::new(5, 5));

        let snapshot = engine.run_hour(1, 1).unwrap();

        // Every deposit is visible once run_hour returns
        assert_eq!(snapshot.produced, 165);
        assert_eq!(snapshot.load, 165);
        assert_eq!(warehouse.current_load(), 165);
        assert_eq!(engine.current_hour(), 1);
    }

    #[test]
    fn test_factories_tick_in_parallel() {
        let (mut engine, _, _) =
            build_engine(10_000, &[1, 1, 1, 1], ProductionDelay::new(100, 0));

        let started = Instant::now();
        engine.run_hour(1, 1).unwrap();

        // Sequential ticks would take 400ms
        assert!(started.elapsed() < Duration::from_millis(350));
    }

    #[test]
    fn test_run_reports_days() {
        let (mut engine, _, sink) = build_engine(10_000, &[10, 20, 30], ProductionDelay::none());

        let days = engine.run(3, 4).unwrap();

        assert_eq!(days.len(), 3);
        assert_eq!(engine.current_hour(), 12);
        assert_eq!(days[0].closing_load(), 240);
        assert_eq!(days[2].closing_load(), 720);
        assert_eq!(days[1].produced(), 240);
        assert_eq!(days[1].hours.len(), 4);

        let closed: Vec<SimEvent> = sink.events_of_kind("day_closed");
        assert_eq!(
            closed,
            vec![
                SimEvent::DayClosed { day: 1, load: 240 },
                SimEvent::DayClosed { day: 2, load: 480 },
                SimEvent::DayClosed { day: 3, load: 720 },
            ]
        );
        assert_eq!(sink.events_of_kind("produced").len(), 36);
    }

    #[test]
    fn test_run_stops_on_overflow() {
        let (mut engine, warehouse, _) = build_engine(100, &[30, 30], ProductionDelay::none());

        let result = engine.run(1, 5);

        assert!(matches!(result, Err(WarehouseError::CapacityExceeded { .. })));
        assert_eq!(engine.current_hour(), 2);
        assert!(warehouse.current_load() <= 100);
    }

    #[test]
    fn test_explicit_pool_size() {
        let warehouse = Arc::new(Warehouse::new(1000));
        let factories = vec![
            Factory::new("A", 5, warehouse.clone()).with_production_delay(ProductionDelay::none()),
            Factory::new("B", 7, warehouse.clone()).with_production_delay(ProductionDelay::none()),
        ];
        let mut engine = CycleEngine::new(factories, warehouse.clone(), Some(1)).unwrap();

        engine.run(1, 2).unwrap();

        assert_eq!(warehouse.current_load(), 24);
        assert_eq!(engine.factories().len(), 2);
    }
}
