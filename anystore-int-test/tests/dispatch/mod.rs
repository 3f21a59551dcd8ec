mod query_dispatch_test;
