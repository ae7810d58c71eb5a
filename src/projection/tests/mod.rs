mod zone_tests;
