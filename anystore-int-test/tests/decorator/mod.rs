mod decorator_chain_test;
mod event_bus_test;
