mod declarations;
