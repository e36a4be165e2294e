mod cycle_engine_tests;
