mod close_first;
